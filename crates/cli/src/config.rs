//! CLI configuration utilities

use anyhow::{Context, Result};
use sc_login_core::AuthConfig;
use std::path::{Path, PathBuf};

/// Default data directory: `SC_LOGIN_STATE_DIR`, else the platform data dir
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SC_LOGIN_STATE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sc-login")
    }
}

/// Load configuration from the given file, or `config.json` in the data
/// directory when present, or the environment alone
pub fn load_config(path: Option<&Path>, data_dir: &Path) -> Result<AuthConfig> {
    let default_path = data_dir.join("config.json");
    let path = path.or_else(|| default_path.exists().then_some(default_path.as_path()));

    let config = match path {
        Some(path) => AuthConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AuthConfig::from_env()?,
    };
    Ok(config)
}

/// Save configuration as JSON
pub fn save_config<P: AsRef<Path>>(config: &AuthConfig, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
