use std::path::{Path, PathBuf};

use anyhow::Context;
use docrest_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Settings read from `docrest.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON snapshot backing the store.
    pub store_path: PathBuf,
    pub db: DbConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("docrest.json"),
            db: DbConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("invalid configuration in {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("could not read {}", path.display())),
        }
    }
}
