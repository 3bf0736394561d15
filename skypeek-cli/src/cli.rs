use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::Password;
use skypeek_core::{
    Config, LocationRequest, ServiceId, Timestep, WeatherCondition, WeatherFlow, WeatherReport,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skypeek", version, about = "Current weather for a place, your location or a point")]
pub struct Cli {
    /// Forecast series to sample: minutely, hourly or daily.
    #[arg(long, global = true)]
    pub timestep: Option<Timestep>,

    /// Print the report as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key for a service.
    Configure {
        /// Service short name: "tomorrow" or "opencage".
        service: String,
    },

    /// Show weather for a place name.
    Show {
        /// Place name, e.g. "Paris".
        place: String,
    },

    /// Show weather for the current device location.
    Here,

    /// Show weather for a latitude/longitude pair.
    At {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// List the weather codes and their labels.
    Codes,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let request = match self.command {
            Command::Configure { service } => return configure(&service),
            Command::Codes => {
                print!("{}", render::code_table(WeatherCondition::ALL));
                return Ok(());
            }
            Command::Show { place } => LocationRequest::Name(place),
            Command::Here => LocationRequest::Device,
            Command::At { latitude, longitude } => LocationRequest::Point { latitude, longitude },
        };

        let config = Config::load()?;
        let timestep = self.timestep.unwrap_or_else(|| config.timestep());
        let flow = WeatherFlow::from_config(&config)?.with_timestep(timestep);
        tracing::debug!(%timestep, ?request, "starting lookup");

        match flow.run(request).await {
            Ok(report) => print_report(&report, self.json),
            Err(failure) => bail!(failure),
        }
    }
}

fn print_report(report: &WeatherReport, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        print!("{}", render::report(report));
    }
    Ok(())
}

fn configure(service: &str) -> anyhow::Result<()> {
    let id = ServiceId::try_from(service)?;
    if !ServiceId::keyed().contains(&id) {
        bail!("Service '{id}' does not need an API key.");
    }

    let path = Config::config_file_path()?;

    let prompt = format!("{} API key:", id.display_name());
    let api_key = Password::new(&prompt)
        .without_confirmation()
        .with_help_message(&format!("Stored in the config file; {} overrides it", id.api_key_env()))
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }

    Config::store_api_key(&path, id, api_key.trim().to_string())?;

    println!("Saved {} API key to {}", id.display_name(), path.display());
    Ok(())
}
