use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use weather_core::Config;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather proxy server")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default).
    Serve {
        /// Address to listen on, e.g. "127.0.0.1:8000".
        #[arg(long)]
        bind: Option<String>,

        /// SQLite URL for the observation history, e.g. "sqlite://weather.db".
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Store the OpenWeather API key and default location in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Serve {
            bind: None,
            database_url: None,
        });

        match command {
            Command::Serve { bind, database_url } => {
                let mut config = load_config(self.config.as_ref())?;
                config.apply_env();
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                if let Some(url) = database_url {
                    config.database.url = url;
                }
                weather_server::run_server(&config).await
            }
            Command::Configure => configure(self.config.as_ref()),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn configure(path: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path)?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    config.default_location.city = inquire::Text::new("Default city:")
        .with_default(&config.default_location.city)
        .prompt()
        .context("Failed to read default city")?;
    config.default_location.country = inquire::Text::new("Default country:")
        .with_default(&config.default_location.country)
        .prompt()
        .context("Failed to read default country")?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.clone()
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
