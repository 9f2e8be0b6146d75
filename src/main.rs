//! taskboard
//!
//! Command-line client for the course task dashboard.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use taskboard::{
    auth::FileSessionStore,
    commands::{self, Command, Context, exit_codes},
    config::{LogFormat, load_config},
    error::AppError,
};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// taskboard - semesters, weeks and task deadlines behind a role-checked gate
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "TASKBOARD_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, env = "TASKBOARD_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Pick up API_URL and friends from a local .env
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref())?;

    // Initialize logging
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (pretty, json) = match config.logging.format {
        LogFormat::Pretty => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(pretty)
        .with(json)
        .with(filter)
        .init();

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url(),
        "Starting taskboard"
    );

    // Session lives on disk so sign-in survives between invocations
    let session = Arc::new(FileSessionStore::new(config.storage.session_file()));
    debug!(path = %session.path().display(), "Using session file");
    let ctx = Context::new(&config, session)
        .inspect_err(|e| error!(error = %e, "Failed to create API client"))?;

    match commands::run(args.command, &ctx).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end());
            }
            Ok(ExitCode::from(exit_codes::SUCCESS))
        }
        Err(AppError::AccessDenied(denied)) => {
            eprintln!("{}", commands::denial_message(&denied));
            Ok(ExitCode::from(exit_codes::ACCESS_DENIED))
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Ok(ExitCode::from(commands::exit_code(&e)))
        }
    }
}
