//! Human-readable output.

use chrono::Local;
use skypeek_core::{WeatherCondition, WeatherReport};

pub fn report(report: &WeatherReport) -> String {
    let sample = &report.sample;

    let mut lines = vec![
        format!("{} ({})", report.location, report.coordinates),
        format!(
            "  {} [{}]",
            sample.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            report.timestep
        ),
        format!("  Condition:     {}", report.condition),
        format!("  Temperature:   {:.1} °C", sample.temperature),
    ];
    if let Some(feels_like) = sample.apparent_temperature {
        lines.push(format!("  Feels like:    {feels_like:.1} °C"));
    }
    lines.push(format!("  Humidity:      {:.0} %", sample.humidity));
    lines.push(format!("  Wind speed:    {:.1} m/s", sample.wind_speed));
    if let Some(pressure) = sample.pressure {
        lines.push(format!("  Pressure:      {pressure:.1} hPa"));
    }
    if let Some(uv) = sample.uv_index {
        lines.push(format!("  UV index:      {uv:.0}"));
    }
    if let Some(visibility) = sample.visibility {
        lines.push(format!("  Visibility:    {visibility:.1} km"));
    }
    if let Some(chance) = sample.precipitation_probability {
        lines.push(format!("  Precipitation: {chance:.0} %"));
    }

    end_lines(lines)
}

pub fn code_table(conditions: &[WeatherCondition]) -> String {
    let lines = conditions
        .iter()
        .filter_map(|condition| condition.code().map(|code| format!("{code:>5}  {condition}")))
        .collect();
    end_lines(lines)
}

/// Newline after every line, nothing for an empty list.
fn end_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use skypeek_core::{Coordinates, Timestep, WeatherSample};

    fn sample() -> WeatherSample {
        WeatherSample {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            temperature: 10.0,
            apparent_temperature: None,
            humidity: 80.0,
            wind_speed: 3.0,
            pressure: Some(1012.5),
            uv_index: None,
            visibility: None,
            precipitation_probability: Some(20.0),
            weather_code: 1001,
        }
    }

    #[test]
    fn report_lists_present_fields_only() {
        let report = WeatherReport::new(
            "Paris".into(),
            Coordinates::new(48.85, 2.35),
            Timestep::Minutely,
            sample(),
        );

        let text = super::report(&report);
        assert!(text.starts_with("Paris (48.8500, 2.3500)"));
        assert!(text.contains("Condition:     Cloudy"));
        assert!(text.contains("Temperature:   10.0 °C"));
        assert!(text.contains("Humidity:      80 %"));
        assert!(text.contains("Pressure:      1012.5 hPa"));
        assert!(text.contains("Precipitation: 20 %"));
        assert!(!text.contains("Feels like"));
        assert!(!text.contains("UV index"));
    }

    #[test]
    fn report_ends_every_line() {
        let report = WeatherReport::new(
            "Paris".into(),
            Coordinates::new(48.85, 2.35),
            Timestep::Minutely,
            sample(),
        );

        let text = super::report(&report);
        assert!(text.ends_with("Precipitation: 20 %\n"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn code_table_empty_for_unknown_only() {
        assert_eq!(code_table(&[WeatherCondition::Unknown]), "");
    }

    #[test]
    fn code_table_skips_unknown() {
        let table = code_table(&[WeatherCondition::Clear, WeatherCondition::Unknown]);
        assert_eq!(table, " 1000  Clear\n");
    }
}
