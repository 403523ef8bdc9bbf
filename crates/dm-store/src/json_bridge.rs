use std::fs;
use std::path::Path;

use rusqlite::OptionalExtension;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dm_core::{CURRENT_VERSION, now_iso8601};

use crate::error::{Result, StoreError};
use crate::store::{HistoryEntry, PairEntry, Store, insert_history_on, insert_pair_on};

/// Everything one owner has saved.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: String,
    pub owner: String,
    pub exported_at: String,
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub compatibility: Vec<PairEntry>,
}

/// Rows actually written by an import; duplicates are skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub history: usize,
    pub compatibility: usize,
}

impl Store {
    pub fn export_json_string(&self, owner: &str) -> Result<String> {
        let backup = Backup {
            version: CURRENT_VERSION.to_string(),
            owner: owner.to_string(),
            exported_at: now_iso8601(),
            history: self.list_history(owner)?,
            compatibility: self.list_compatibility(owner)?,
        };
        serde_json::to_string_pretty(&backup)
            .map_err(|e| StoreError::InvalidData(format!("JSON export failed: {e}")))
    }

    pub fn export_json_file(&self, owner: &str, path: &Path) -> Result<()> {
        let json = self.export_json_string(owner)?;
        fs::write(path, json).map_err(|e| {
            StoreError::InvalidData(format!("failed to write {}: {e}", path.display()))
        })
    }

    /// Merge a backup into `owner`'s history. Entries whose date (or pair)
    /// is already saved are left alone.
    pub fn import_json_str(&self, owner: &str, json: &str) -> Result<ImportSummary> {
        let backup: Backup = serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidData(format!("invalid JSON: {e}")))?;
        if backup.version != CURRENT_VERSION {
            return Err(StoreError::InvalidData(format!(
                "unsupported backup version {} (expected {CURRENT_VERSION})",
                backup.version
            )));
        }

        let tx = self.conn().unchecked_transaction()?;
        let mut summary = ImportSummary::default();

        // Oldest first so rowid order matches creation order.
        for mut entry in backup.history.into_iter().rev() {
            entry.owner_id = owner.to_string();
            if id_taken(&tx, "history", entry.id)? {
                entry.id = Uuid::new_v4();
            }
            summary.history += insert_history_on(&tx, &entry)?;
        }
        for mut entry in backup.compatibility.into_iter().rev() {
            entry.owner_id = owner.to_string();
            if id_taken(&tx, "compatibility_history", entry.id)? {
                entry.id = Uuid::new_v4();
            }
            summary.compatibility += insert_pair_on(&tx, &entry)?;
        }

        tx.commit()?;
        tracing::info!(
            history = summary.history,
            compatibility = summary.compatibility,
            "backup imported"
        );
        Ok(summary)
    }

    pub fn import_json_file(&self, owner: &str, path: &Path) -> Result<ImportSummary> {
        let json = fs::read_to_string(path).map_err(|e| {
            StoreError::InvalidData(format!("failed to read {}: {e}", path.display()))
        })?;
        self.import_json_str(owner, &json)
    }
}

fn id_taken(conn: &rusqlite::Connection, table: &str, id: Uuid) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1"),
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
