use anyhow::Result;
use sc_login_core::tracing::{InstrumentationConfig, init_tracing};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the CLI
pub fn init_logging(log_level: Level, data_dir: &Path, no_file_log: bool) -> Result<()> {
    let filter = default_filter(log_level);

    if no_file_log {
        // Only log to stderr
        init_tracing(&InstrumentationConfig::from_env().with_log_level(filter))?;
        Ok(())
    } else {
        init_file_logging(&filter, data_dir)
    }
}

fn default_filter(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("sc_login={level},sc_login_auth={level},sc_login_core={level},sc_login_http={level}")
}

fn init_file_logging(filter: &str, data_dir: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    std::fs::create_dir_all(data_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(data_dir.join("cli.log"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_workspace_crates() {
        let filter = default_filter(Level::DEBUG);
        assert!(filter.contains("sc_login_auth=debug"));
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
