//! # Campaigns Console Entry Point
//!
//! Loads configuration, connects the pool, applies migrations and runs an
//! operator session on stdin, or the commands given with `--exec`.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use campaigns::{
    config::ConfigLoader,
    console::{Console, SessionState},
    db, services::Services, telemetry,
};
use clap::Parser;

/// Console for managing campaigns, channels and their daily metrics
#[derive(Parser, Debug)]
#[command(name = "campaigns", version, about)]
struct Args {
    /// JSON config file (defaults to ./config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory searched for config.json and .env files
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Skip applying pending migrations at startup
    #[arg(long)]
    no_migrate: bool,

    /// Run this command and exit instead of reading stdin (repeatable)
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    exec: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration from the JSON file, layered env files and variables
    let mut loader = match args.base_dir {
        Some(dir) => ConfigLoader::with_base_dir(dir),
        None => ConfigLoader::new(),
    };
    if let Some(path) = args.config {
        loader = loader.config_file(path);
    }
    let config = loader.load().context("Failed to load configuration")?;

    telemetry::init_tracing(&config).context("Failed to initialize tracing")?;
    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let conn = db::init_pool(&config).await?;
    db::health_check(&conn).await?;
    tracing::info!("Database health check passed");
    if config.database.auto_migrate && !args.no_migrate {
        db::run_migrations(&conn).await?;
        tracing::info!("Database migrations applied");
    }

    let services = Services::new(Arc::new(conn), &config);
    let stdout = std::io::stdout();

    if !args.exec.is_empty() {
        let mut console = Console::new(services, stdout.lock());
        for line in &args.exec {
            console.handle_line(line).await?;
            if console.state() == SessionState::Stopped {
                break;
            }
        }
        return Ok(());
    }

    let interactive = std::io::stdin().is_terminal();
    let mut console = Console::new(services, stdout.lock()).with_prompt(interactive);
    console
        .run(tokio::io::BufReader::new(tokio::io::stdin()))
        .await?;

    Ok(())
}
