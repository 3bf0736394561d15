//! Weather code classification.
//!
//! Codes follow the Tomorrow.io `weatherCode` table. Anything outside the
//! table classifies as [`WeatherCondition::Unknown`].

use serde::{Deserialize, Serialize};

/// Sky / precipitation condition derived from a provider weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    MostlyClear,
    PartlyCloudy,
    MostlyCloudy,
    Cloudy,
    Fog,
    LightFog,
    Drizzle,
    Rain,
    LightRain,
    HeavyRain,
    Snow,
    Flurries,
    LightSnow,
    HeavySnow,
    FreezingDrizzle,
    FreezingRain,
    LightFreezingRain,
    HeavyFreezingRain,
    IcePellets,
    HeavyIcePellets,
    LightIcePellets,
    Thunderstorm,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Every known condition, in code order.
    pub const ALL: &'static [WeatherCondition] = &[
        Self::Clear,
        Self::Cloudy,
        Self::MostlyClear,
        Self::PartlyCloudy,
        Self::MostlyCloudy,
        Self::Fog,
        Self::LightFog,
        Self::Drizzle,
        Self::Rain,
        Self::LightRain,
        Self::HeavyRain,
        Self::Snow,
        Self::Flurries,
        Self::LightSnow,
        Self::HeavySnow,
        Self::FreezingDrizzle,
        Self::FreezingRain,
        Self::LightFreezingRain,
        Self::HeavyFreezingRain,
        Self::IcePellets,
        Self::HeavyIcePellets,
        Self::LightIcePellets,
        Self::Thunderstorm,
    ];

    pub fn from_code(code: i64) -> Self {
        match code {
            1000 => Self::Clear,
            1001 => Self::Cloudy,
            1100 => Self::MostlyClear,
            1101 => Self::PartlyCloudy,
            1102 => Self::MostlyCloudy,
            2000 => Self::Fog,
            2100 => Self::LightFog,
            4000 => Self::Drizzle,
            4001 => Self::Rain,
            4200 => Self::LightRain,
            4201 => Self::HeavyRain,
            5000 => Self::Snow,
            5001 => Self::Flurries,
            5100 => Self::LightSnow,
            5101 => Self::HeavySnow,
            6000 => Self::FreezingDrizzle,
            6001 => Self::FreezingRain,
            6200 => Self::LightFreezingRain,
            6201 => Self::HeavyFreezingRain,
            7000 => Self::IcePellets,
            7101 => Self::HeavyIcePellets,
            7102 => Self::LightIcePellets,
            8000 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Provider code for this condition; `None` for [`WeatherCondition::Unknown`].
    pub fn code(&self) -> Option<i64> {
        let code = match self {
            Self::Clear => 1000,
            Self::Cloudy => 1001,
            Self::MostlyClear => 1100,
            Self::PartlyCloudy => 1101,
            Self::MostlyCloudy => 1102,
            Self::Fog => 2000,
            Self::LightFog => 2100,
            Self::Drizzle => 4000,
            Self::Rain => 4001,
            Self::LightRain => 4200,
            Self::HeavyRain => 4201,
            Self::Snow => 5000,
            Self::Flurries => 5001,
            Self::LightSnow => 5100,
            Self::HeavySnow => 5101,
            Self::FreezingDrizzle => 6000,
            Self::FreezingRain => 6001,
            Self::LightFreezingRain => 6200,
            Self::HeavyFreezingRain => 6201,
            Self::IcePellets => 7000,
            Self::HeavyIcePellets => 7101,
            Self::LightIcePellets => 7102,
            Self::Thunderstorm => 8000,
            Self::Unknown => return None,
        };
        Some(code)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::MostlyClear => "Mostly Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::MostlyCloudy => "Mostly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::LightFog => "Light Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::LightRain => "Light Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Flurries => "Flurries",
            Self::LightSnow => "Light Snow",
            Self::HeavySnow => "Heavy Snow",
            Self::FreezingDrizzle => "Freezing Drizzle",
            Self::FreezingRain => "Freezing Rain",
            Self::LightFreezingRain => "Light Freezing Rain",
            Self::HeavyFreezingRain => "Heavy Freezing Rain",
            Self::IcePellets => "Ice Pellets",
            Self::HeavyIcePellets => "Heavy Ice Pellets",
            Self::LightIcePellets => "Light Ice Pellets",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a raw provider weather code.
pub fn classify(code: i64) -> &'static str {
    WeatherCondition::from_code(code).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_codes() {
        let table = [
            (1000, "Clear"),
            (1100, "Mostly Clear"),
            (1101, "Partly Cloudy"),
            (1102, "Mostly Cloudy"),
            (1001, "Cloudy"),
            (2000, "Fog"),
            (2100, "Light Fog"),
            (4000, "Drizzle"),
            (4001, "Rain"),
            (4200, "Light Rain"),
            (4201, "Heavy Rain"),
            (5000, "Snow"),
            (5001, "Flurries"),
            (5100, "Light Snow"),
            (5101, "Heavy Snow"),
            (6000, "Freezing Drizzle"),
            (6001, "Freezing Rain"),
            (6200, "Light Freezing Rain"),
            (6201, "Heavy Freezing Rain"),
            (7000, "Ice Pellets"),
            (7101, "Heavy Ice Pellets"),
            (7102, "Light Ice Pellets"),
            (8000, "Thunderstorm"),
        ];

        for (code, label) in table {
            assert_eq!(classify(code), label, "code {code}");
        }
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in [0, -1, 999, 1002, 3000, 7100, i64::MAX, i64::MIN] {
            assert_eq!(classify(code), "Unknown", "code {code}");
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Unknown);
        }
    }

    #[test]
    fn test_classify_is_stable() {
        assert_eq!(classify(4201), classify(4201));
        assert_eq!(classify(12345), classify(12345));
    }

    #[test]
    fn test_code_matches_from_code() {
        for condition in WeatherCondition::ALL {
            let code = condition.code().expect("known condition has a code");
            assert_eq!(WeatherCondition::from_code(code), *condition);
        }
        assert_eq!(WeatherCondition::Unknown.code(), None);
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(WeatherCondition::HeavyFreezingRain.to_string(), "Heavy Freezing Rain");
        assert_eq!(WeatherCondition::default().to_string(), "Unknown");
    }
}
