use std::{fmt, str::FromStr};

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{
    City, Config, SqliteCityStore, WeatherProvider, WeatherSnapshot, provider::provider_from_config,
};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Track the current weather of a list of cities",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Address to serve on, as host:port (default: 127.0.0.1:5000 or the configured `bind`).
    pub addr: Option<BindAddr>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Fetch and print the current weather for one city.
    Show {
        /// City name, as understood by OpenWeather.
        city: String,
    },
}

/// `host:port` pair accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindAddr {
    pub host: String,
    pub port: u16,
}

impl FromStr for BindAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) =
            s.rsplit_once(':').ok_or_else(|| format!("expected host:port, got '{s}'"))?;

        if host.is_empty() {
            return Err(format!("missing host in '{s}'"));
        }

        let port = port.parse::<u16>().map_err(|_| format!("invalid port '{port}'"))?;

        Ok(Self { host: host.to_string(), port })
    }
}

impl fmt::Display for BindAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => show(&city).await,
            None => serve(self.addr).await,
        }
    }
}

async fn serve(addr: Option<BindAddr>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let bind = addr.map(|a| a.to_string()).unwrap_or_else(|| config.bind().to_string());

    let db_path = config.database_path()?;
    let store = SqliteCityStore::open(&db_path)
        .with_context(|| format!("Failed to open city database: {}", db_path.display()))?;
    let provider = provider_from_config(&config)?;

    tracing::info!(db = %db_path.display(), "city database ready");

    server::serve(&bind, AppState::new(store, provider)).await
}

fn configure() -> anyhow::Result<()> {
    // Read the file directly so an env override is never written to disk.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    let saved = config.save()?;
    println!("Saved configuration to {}", saved.display());

    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let info = provider
        .fetch(city)
        .await
        .with_context(|| format!("Failed to fetch weather for '{city}'"))?;

    // Only used for display; the id is irrelevant outside the store.
    let snapshot = WeatherSnapshot::from_info(&City { id: 0, name: city.to_string() }, &info);

    let clock = |ts: Option<chrono::DateTime<chrono::Utc>>| {
        ts.map(|t| t.format("%H:%M UTC").to_string()).unwrap_or_else(|| "?".to_string())
    };

    println!(
        "{city}: {:.1}°C, {} ({})",
        snapshot.temperature, snapshot.condition, snapshot.day_period
    );
    println!(
        "  sunrise {}  sunset {}  observed {}",
        clock(info.sunrise_utc()),
        clock(info.sunset_utc()),
        clock(info.observed_at_utc()),
    );

    Ok(())
}
