//! sc-login - Solution Center login from the command line

mod commands;
mod config;
mod logging;
mod navigation;
mod store;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "sc-login")]
#[command(about = "Log in to Solution Center environments")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Data directory for the session, configuration and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Configuration file (defaults to <data dir>/config.json, then SC_LOGIN_* variables)
    #[arg(short = 'c', long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Environment to use instead of the configured one
    #[arg(short = 'e', long, global = true)]
    environment: Option<String>,

    /// Token service base URL (LOCAL and TESTING only)
    #[arg(long, global = true)]
    token_service: Option<String>,

    /// Request timeout in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "10")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);
    logging::init_logging(cli.log_level.into(), &data_dir, cli.no_file_log)?;

    info!("Starting sc-login");

    let ctx = Context {
        data_dir,
        config: cli.config,
        environment: cli.environment,
        token_service: cli.token_service,
        timeout: cli.timeout,
    };

    match cli.command.execute(ctx).await {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
