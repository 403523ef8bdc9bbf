//! User settings read from `config.toml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dm_core::BirthDate;

use crate::error::{Result, StoreError};

pub const CONFIG_FILE: &str = "config.toml";

/// How dates are printed back to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    Iso,
    #[default]
    Dotted,
}

impl DateFormat {
    pub fn format(&self, date: BirthDate) -> String {
        match self {
            DateFormat::Iso => date.to_iso(),
            DateFormat::Dotted => date.to_display(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key every saved entry is filed under.
    pub owner: String,
    pub date_format: DateFormat,
    /// Fill the celebrity table on first open.
    pub seed_celebrities: bool,
    /// Where `matrix.db` lives, if not next to this file.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "local".to_string(),
            date_format: DateFormat::default(),
            seed_celebrities: true,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load `<dir>/config.toml`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path).map_err(|e| {
            StoreError::InvalidData(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            StoreError::InvalidData(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| StoreError::InvalidData(format!("invalid config: {e}")))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| StoreError::InvalidData(format!("config serialization failed: {e}")))
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, self.to_toml_string()?).map_err(|e| {
            StoreError::InvalidData(format!("failed to write {}: {e}", path.display()))
        })
    }
}
