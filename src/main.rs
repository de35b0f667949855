//! Sitat CLI entry point.

use anyhow::Result;
use clap::Parser;
use sitat::cli::{commands, Cli, Commands};
use sitat::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("sitat={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Parse {
            input,
            json,
            format,
            pairs,
        } => {
            commands::run_parse(&input, json, format.as_deref(), pairs, settings)?;
        }

        Commands::Extract {
            input,
            client_id,
            company,
            interviewee,
            deal_status,
            date,
            output,
            format,
            no_store,
        } => {
            let args = commands::ExtractArgs {
                input,
                client_id,
                company,
                interviewee,
                deal_status,
                date,
                output,
                format,
                no_store,
            };
            commands::run_extract(args, settings).await?;
        }

        Commands::Export {
            id,
            company,
            output,
            format,
        } => {
            commands::run_export(&id, company, output, &format, settings)?;
        }

        Commands::List => {
            commands::run_list(settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
