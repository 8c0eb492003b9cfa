//! # Server Configuration
//!
//! Resolved from, in order of precedence: CLI flags, environment
//! (`PIZZERIA_*`, optionally from `.env`), `.pizzeria/config.json`, defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = ".pizzeria/pizzeria.db";
pub const CONFIG_PATH: &str = ".pizzeria/config.json";

/// Settings as persisted in the JSON config file or read from the environment
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PersistedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<bool>,
}

impl PersistedConfig {
    /// Load the config file; a missing or unreadable file yields defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Read `PIZZERIA_PORT`, `PIZZERIA_DB` and `PIZZERIA_SEED` through `lookup`
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PIZZERIA_PORT").and_then(|v| v.parse().ok()),
            db_path: lookup("PIZZERIA_DB").map(PathBuf::from),
            seed: lookup("PIZZERIA_SEED").and_then(|v| parse_bool(&v)),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay every field `other` sets
    pub fn merge(&mut self, other: PersistedConfig) {
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.db_path.is_some() {
            self.db_path = other.db_path;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Fully resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub seed: bool,
}

impl From<PersistedConfig> for ServerConfig {
    fn from(config: PersistedConfig) -> Self {
        Self {
            port: config.port.unwrap_or(DEFAULT_PORT),
            db_path: config
                .db_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            seed: config.seed.unwrap_or(true),
        }
    }
}

impl ServerConfig {
    /// file < env < cli
    pub fn resolve(cli: PersistedConfig) -> Self {
        let mut config = PersistedConfig::load(Path::new(CONFIG_PATH));
        config.merge(PersistedConfig::from_env());
        config.merge(cli);
        config.into()
    }
}
