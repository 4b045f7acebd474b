//! Create or display the CLI config file

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::{config_file, load_config, save_config, SigmaConfig};

pub fn init(path: Option<&Path>, protocol_version: Option<u32>, force: bool) -> Result<()> {
    let mut config = SigmaConfig::default();
    if let Some(version) = protocol_version {
        config.protocol_version = version;
    }

    let written = save_config(&config, path, force)?;
    println!("{}", "Config written".green());
    println!("  {}", written.display());
    Ok(())
}

pub fn show(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    println!("{}", config_file(path)?.display().to_string().dimmed());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
