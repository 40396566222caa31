use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::StoreConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Read `config.toml` from the data directory. A missing file yields the
/// default configuration.
pub fn read_config(dir: &Path) -> Result<StoreConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let config: StoreConfig =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.max_text_len == 0 {
        return Err(ConfigError::Invalid("max_text_len must be at least 1".into()));
    }
    if config.fallback_group.trim().is_empty() {
        return Err(ConfigError::Invalid("fallback_group must not be empty".into()));
    }
    if config.default_groups.iter().any(|g| g.trim().is_empty()) {
        return Err(ConfigError::Invalid("default_groups must not contain empty names".into()));
    }
    Ok(())
}
