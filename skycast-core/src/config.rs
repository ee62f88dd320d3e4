use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// Fallback language hint forwarded to the provider when the caller does not
/// supply a locale.
pub const DEFAULT_LANGUAGE: &str = "es";

/// Read-only client configuration.
///
/// Constructed explicitly and handed to [`crate::client::WeatherClient`];
/// nothing in the core reads ambient process-wide state, so tests can
/// substitute endpoints and keys freely. The load/save helpers exist for the
/// CLI, which persists the configuration as TOML under the platform config
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: String,

    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Language hint used when a fetch does not specify a locale.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

fn default_forecast_url() -> String {
    DEFAULT_FORECAST_URL.to_string()
}

fn default_geocoding_url() -> String {
    DEFAULT_GEOCODING_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Config {
    /// Configuration with the reference endpoints and fallback language.
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            weather_url: default_weather_url(),
            forecast_url: default_forecast_url(),
            geocoding_url: default_geocoding_url(),
            language: default_language(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_reference_endpoints() {
        let cfg = Config::new("KEY");
        assert_eq!(cfg.api_key, "KEY");
        assert_eq!(cfg.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.language, DEFAULT_LANGUAGE);
        assert!(cfg.has_api_key());
    }

    #[test]
    fn default_has_no_api_key() {
        let cfg = Config::default();
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn parse_minimal_toml_fills_defaults() {
        let cfg: Config = toml::from_str("api_key = \"SECRET\"").expect("minimal config parses");
        assert_eq!(cfg.api_key, "SECRET");
        assert_eq!(cfg.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(cfg.language, DEFAULT_LANGUAGE);
    }
}
