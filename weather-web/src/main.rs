//! Binary crate for the `weather` web application.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the city dashboard over HTTP
//! - Interactive configuration

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod flash;
mod page;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
