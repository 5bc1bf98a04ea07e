use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable that takes precedence over the configured API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// OpenWeather credentials and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// bind = "0.0.0.0:8080"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Address the web server listens on, as `host:port`.
    pub bind: Option<String>,

    /// SQLite file holding the city list.
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_with_env(&path, std::env::var(API_KEY_ENV).ok())
    }

    /// Load from `path`; a non-blank `env_api_key` wins over the file's key.
    pub fn load_with_env(path: &Path, env_api_key: Option<String>) -> Result<Self> {
        let mut cfg = Self::load_from(path)?;

        if let Some(key) = env_api_key {
            cfg.override_api_key(key);
        }

        Ok(cfg)
    }

    /// Load config from an explicit path, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to disk, creating parent directories as needed.
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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Configured database path, falling back to the platform data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("weather.db")),
        }
    }

    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    /// Returns the API key, if present and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Replace the key for this process only; empty values are ignored.
    pub fn override_api_key(&mut self, api_key: String) {
        if !api_key.trim().is_empty() {
            self.openweather.api_key = Some(api_key);
        }
    }

    pub fn openweather_url(&self) -> &str {
        self.openweather.base_url.as_deref().unwrap_or(DEFAULT_OPENWEATHER_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.openweather.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-tracker", "weather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
