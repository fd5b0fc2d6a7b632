use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use sotto_types::RelayConfig;

/// Returns the sotto home directory (~/.sotto/)
pub fn sotto_home() -> PathBuf {
    dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".sotto")
}

/// Returns the path to the config file (~/.sotto/config.toml)
pub fn config_path() -> PathBuf {
    sotto_home().join("config.toml")
}

/// Load config from disk, creating default if it doesn't exist.
pub fn load_config() -> Result<RelayConfig> {
    load_config_from(&config_path())
}

/// Save config to disk, overwriting the existing file.
pub fn save_config(config: &RelayConfig) -> Result<()> {
    save_config_to(&config_path(), config)
}

pub fn load_config_from(path: &Path) -> Result<RelayConfig> {
    if !path.exists() {
        let default = RelayConfig::default();
        save_config_to(path, &default)?;
        return Ok(default);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: RelayConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    Ok(config)
}

pub fn save_config_to(path: &Path, config: &RelayConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, toml_str)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}
