use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{location::device, model::Timestep, service::ServiceId};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SKYPEEK_CONFIG";

/// Configuration for a single service.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the public endpoint, e.g. for a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Device location sensor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_device_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_device_timeout")]
    pub timeout_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_device_endpoint(),
            timeout_secs: default_device_timeout(),
        }
    }
}

impl DeviceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_device_endpoint() -> String {
    ServiceId::IpApi.default_base_url().to_string()
}

fn default_device_timeout() -> u64 {
    device::DEFAULT_TIMEOUT.as_secs()
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Series to sample from when the caller doesn't pick one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestep: Option<Timestep>,

    /// Timeout for geocoding and forecast requests; none when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Example TOML:
    /// [services.tomorrow]
    /// api_key = "..."
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,

    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist
    /// yet. Environment credentials are applied on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(std::env::vars());
        Ok(cfg)
    }

    /// Load config from `path` without looking at the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Set the API key for `id` in the file at `path`, keeping every other
    /// stored value. Environment credentials are never written to disk.
    pub fn store_api_key(path: &Path, id: ServiceId, api_key: String) -> Result<()> {
        let mut cfg = Self::load_from(path)?;
        cfg.upsert_api_key(id, api_key);
        cfg.save_to(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file; `SKYPEEK_CONFIG` wins over the platform directory.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let dirs = ProjectDirs::from("dev", "skypeek", "skypeek")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Take API keys from `SKYPEEK_<SERVICE>_API_KEY` variables in `vars`.
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let wanted: Vec<(String, ServiceId)> = ServiceId::keyed()
            .iter()
            .map(|id| (id.api_key_env(), *id))
            .collect();

        for (name, value) in vars {
            let Some((_, id)) = wanted.iter().find(|(env, _)| *env == name) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            tracing::debug!(service = %id, "api key taken from environment");
            self.upsert_api_key(*id, value.trim().to_string());
        }
    }

    pub fn service_config(&self, id: ServiceId) -> Option<&ServiceConfig> {
        self.services.get(id.as_str())
    }

    /// Set/replace the API key for a service.
    pub fn upsert_api_key(&mut self, id: ServiceId, api_key: String) {
        self.services.entry(id.as_str().to_string()).or_default().api_key = Some(api_key);
    }

    /// Returns API key for a service, if present and non-empty.
    pub fn api_key(&self, id: ServiceId) -> Option<&str> {
        self.service_config(id)
            .and_then(|cfg| cfg.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn is_service_configured(&self, id: ServiceId) -> bool {
        self.api_key(id).is_some()
    }

    /// Configured base URL, falling back to the public endpoint.
    pub fn base_url(&self, id: ServiceId) -> &str {
        self.service_config(id)
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| id.default_base_url())
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep.unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
