//! Lekse CLI entry point.

use anyhow::Result;
use clap::Parser;
use lekse::cli::{commands, Cli, Commands};
use lekse::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging; -v flags override the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lekse={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Transcript { video } => {
            commands::run_transcript(&video, settings).await?;
        }

        Commands::Index { video } => {
            commands::run_index(&video, settings).await?;
        }

        Commands::Ask {
            video,
            question,
            provider,
            api_key,
            context,
        } => {
            commands::run_ask(&video, &question, &provider, &api_key, context, settings).await?;
        }
    }

    Ok(())
}
