use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::store::Store;

pub const DATA_DIR_ENV: &str = "DM_DATA_DIR";
pub const DB_FILE: &str = "matrix.db";

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Explicit path, then `$DM_DATA_DIR`, then `~/.destiny-matrix`.
pub fn resolve_base_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match env::var(DATA_DIR_ENV) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v),
        _ => dirs_home().join(".destiny-matrix"),
    }
}

/// The store plus the settings that came with it.
pub struct DataDir {
    root: PathBuf,
    config: Config,
    store: Store,
}

impl DataDir {
    /// Open (creating as needed) the data directory and its database.
    /// `base_dir` overrides env/home resolution.
    pub fn open(base_dir: Option<&Path>) -> Result<Self> {
        let base = resolve_base_dir(base_dir);
        create_dir(&base)?;
        let config = Config::load(&base)?;

        let root = config.data_dir.clone().unwrap_or(base);
        create_dir(&root)?;
        let store = Store::open(&root.join(DB_FILE))?;
        tracing::debug!(path = %root.display(), "data directory opened");

        let dd = Self {
            root,
            config,
            store,
        };
        dd.seed_if_enabled()?;
        Ok(dd)
    }

    /// In-memory store with default settings (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let dd = Self {
            root: PathBuf::from(":memory:"),
            config: Config::default(),
            store: Store::open_in_memory()?,
        };
        dd.seed_if_enabled()?;
        Ok(dd)
    }

    fn seed_if_enabled(&self) -> Result<()> {
        if self.config.seed_celebrities {
            self.store.seed_celebrities()?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Owner override, falling back to the configured one.
    pub fn owner<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.config.owner.as_str())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        StoreError::InvalidData(format!("failed to create {}: {e}", dir.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("nested/dm");
        let dd = DataDir::open(Some(&base)).unwrap();
        assert!(base.join(DB_FILE).exists());
        assert_eq!(dd.root(), base);
    }

    #[test]
    fn test_seeds_on_first_open_only() {
        let tmp = tempfile::tempdir().unwrap();
        let n = DataDir::open(Some(tmp.path()))
            .unwrap()
            .store()
            .celebrity_count()
            .unwrap();
        assert_eq!(n, dm_core::CELEBRITIES.len());

        let again = DataDir::open(Some(tmp.path())).unwrap();
        assert_eq!(again.store().celebrity_count().unwrap(), n);
    }

    #[test]
    fn test_config_can_disable_seeding() {
        let tmp = tempfile::tempdir().unwrap();
        Config {
            seed_celebrities: false,
            ..Config::default()
        }
        .save(tmp.path())
        .unwrap();
        let dd = DataDir::open(Some(tmp.path())).unwrap();
        assert_eq!(dd.store().celebrity_count().unwrap(), 0);
    }

    #[test]
    fn test_config_redirects_database() {
        let tmp = tempfile::tempdir().unwrap();
        let elsewhere = tmp.path().join("db");
        Config {
            data_dir: Some(elsewhere.clone()),
            ..Config::default()
        }
        .save(tmp.path())
        .unwrap();
        DataDir::open(Some(tmp.path())).unwrap();
        assert!(elsewhere.join(DB_FILE).exists());
        assert!(!tmp.path().join(DB_FILE).exists());
    }

    #[test]
    fn test_owner_override() {
        let dd = DataDir::open_in_memory().unwrap();
        assert_eq!(dd.owner(None), "local");
        assert_eq!(dd.owner(Some("bob")), "bob");
        assert_eq!(dd.owner(Some("  ")), "local");
    }

    #[test]
    fn test_explicit_base_wins() {
        let p = Path::new("/tmp/x");
        assert_eq!(resolve_base_dir(Some(p)), p);
    }
}
