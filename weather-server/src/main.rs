//! Binary crate for the `weather` server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Starting the HTTP server

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    weather_server::telemetry::init_tracing("info")?;

    let cmd = cli::Cli::parse();
    cmd.run().await
}
