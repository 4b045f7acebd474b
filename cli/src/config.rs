//! Configuration for the Sigma CLI
//!
//! Only protocol settings live here. Master keys are never written to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sigma::ProtocolVersion;

/// Default directory for CLI state
const SIGMA_DIR: &str = ".sigma";
const CONFIG_FILE: &str = "config.json";

/// Filter used when neither the config nor `RUST_LOG` says otherwise
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SigmaConfig {
    /// Protocol version used for new spends (30 or 31)
    pub protocol_version: u32,
    /// `tracing` filter directive, e.g. `sigma=debug`
    pub log_filter: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Default for SigmaConfig {
    fn default() -> Self {
        Self {
            protocol_version: ProtocolVersion::default().number(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl SigmaConfig {
    pub fn protocol_version(&self) -> Result<ProtocolVersion> {
        ProtocolVersion::try_from(self.protocol_version)
            .with_context(|| format!("Invalid protocol_version in config: {}", self.protocol_version))
    }
}

/// Get the sigma directory path
pub fn sigma_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(SIGMA_DIR))
}

/// Get the config file path, honoring an explicit override
pub fn config_file(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(sigma_dir()?.join(CONFIG_FILE)),
    }
}

/// Load the config, falling back to defaults when no file exists
pub fn load_config(path: Option<&Path>) -> Result<SigmaConfig> {
    let path = config_file(path)?;
    if !path.exists() {
        return Ok(SigmaConfig::default());
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SigmaConfig = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.protocol_version()?;

    Ok(config)
}

/// Save the config to disk
pub fn save_config(config: &SigmaConfig, path: Option<&Path>, force: bool) -> Result<PathBuf> {
    config.protocol_version()?;

    let path = config_file(path)?;
    if path.exists() && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
