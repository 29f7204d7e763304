use std::process::ExitCode;

use app::App;
use clap::Parser;
use config::LogConfig;
use dictionary::LookupStatus;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod cli;
mod config;
mod player;
mod utilities;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Args::parse();

    let config_path = args.config.clone().or_else(config::config_path);
    let config = match &config_path {
        Some(path) => config::load_from(path)?,
        None => config::AppConfig::default(),
    };
    initialize_logging(&config.log)?;
    info!(config = ?config_path, base_url = ?args.base_url, "Starting dictionary-app");

    let mut app = App::new(config, config_path, args.base_url)?;
    match args.word {
        Some(word) => match app.define(&word).await? {
            LookupStatus::Error => Ok(ExitCode::FAILURE),
            _ => Ok(ExitCode::SUCCESS),
        },
        None => {
            app.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn initialize_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    Ok(())
}
