//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod list;
pub mod process;
pub mod summary;

use std::path::{Path, PathBuf};

use receipt_core::ReceiptConfig;
use tracing::debug;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("receipt")
        .join("config.json")
}

/// Resolve the configuration file: the explicit path if given, else the default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; a missing default file
/// means defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ReceiptConfig> {
    if let Some(path) = config_path {
        return Ok(ReceiptConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ReceiptConfig::from_file(&path)?)
    } else {
        Ok(ReceiptConfig::default())
    }
}
