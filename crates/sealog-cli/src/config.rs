use std::path::{Path, PathBuf};

use serde::Deserialize;

use sealog_core::SealogError;

/// Optional settings file. Every field may be overridden on the command line.
///
/// The passphrase is never read from this file.
#[derive(Debug, Default, Deserialize)]
pub struct SealogConfig {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub throttle: ThrottleSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub buffer_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThrottleSection {
    pub events_per_second: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SealogConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        SealogError::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&contents).map_err(|e| {
        SealogError::Config(format!("Failed to parse config {}: {}", path.display(), e))
    })?;
    Ok(config)
}

/// Load the config file, if any.
///
/// An explicitly named file must exist. The default location is only read
/// when something is there.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<SealogConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match default_config_path() {
        Ok(path) if path.exists() => read_config(&path),
        _ => Ok(SealogConfig::default()),
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealog"));
        }
    }
    Ok(home_dir()?.join(".config").join("sealog"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
