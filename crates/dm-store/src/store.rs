use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dm_core::snapshot::{
    compatibility_from_json, compatibility_to_json, personal_from_json, personal_to_json,
};
use dm_core::{
    Arcana, BirthDate, CelebrityRecord, CompatibilityMatrix, PersonalMatrix, now_iso8601, pair_id,
    seed_records,
};

use crate::error::{Result, StoreError};
use crate::schema;

/// Name stored when the caller leaves it blank.
pub const DEFAULT_NAME: &str = "Unnamed";

/// Result of a deduplicated save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Uuid),
    AlreadySaved(Uuid),
}

impl SaveOutcome {
    pub fn id(&self) -> Uuid {
        match self {
            SaveOutcome::Saved(id) | SaveOutcome::AlreadySaved(id) => *id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// One saved personal matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub owner_id: String,
    pub person_name: String,
    pub birth_date: BirthDate,
    pub matrix: PersonalMatrix,
    pub is_favorite: bool,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub name: String,
    pub birth_date: BirthDate,
}

/// One saved compatibility reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairEntry {
    pub id: Uuid,
    pub owner_id: String,
    pub pair_id: String,
    pub first: Partner,
    pub second: Partner,
    pub matrix: CompatibilityMatrix,
    pub created_at: String,
}

impl PairEntry {
    /// `"Anna + Boris"`
    pub fn pair_names(&self) -> String {
        format!("{} + {}", self.first.name, self.second.name)
    }

    /// `"01.06.1926 & 02.09.1964"`
    pub fn dates_label(&self) -> String {
        format!(
            "{} & {}",
            self.first.birth_date.to_display(),
            self.second.birth_date.to_display()
        )
    }
}

fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME
    } else {
        trimmed
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Personal history ---

    /// Save a matrix unless this owner already saved the same birth date.
    pub fn save_matrix(
        &self,
        owner: &str,
        name: &str,
        date: BirthDate,
        matrix: &PersonalMatrix,
    ) -> Result<SaveOutcome> {
        if let Some(id) = self.find_matrix(owner, date)? {
            tracing::debug!(%id, %date, "matrix already in history");
            return Ok(SaveOutcome::AlreadySaved(id));
        }
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            person_name: display_name(name).to_string(),
            birth_date: date,
            matrix: *matrix,
            is_favorite: false,
            created_at: now_iso8601(),
        };
        insert_history_on(&self.conn, &entry)?;
        tracing::info!(id = %entry.id, %date, "matrix saved");
        Ok(SaveOutcome::Saved(entry.id))
    }

    pub fn is_matrix_saved(&self, owner: &str, date: BirthDate) -> Result<bool> {
        Ok(self.find_matrix(owner, date)?.is_some())
    }

    fn find_matrix(&self, owner: &str, date: BirthDate) -> Result<Option<Uuid>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM history WHERE owner_id = ?1 AND birth_date = ?2",
                params![owner, date.to_iso()],
                |row| row.get(0),
            )
            .optional()?;
        id.as_deref().map(parse_uuid).transpose()
    }

    pub fn get_entry(&self, id: Uuid) -> Result<Option<HistoryEntry>> {
        let entries = self.query_history("WHERE id = ?1", &id.to_string())?;
        Ok(entries.into_iter().next())
    }

    /// Newest first.
    pub fn list_history(&self, owner: &str) -> Result<Vec<HistoryEntry>> {
        self.query_history("WHERE owner_id = ?1", owner)
    }

    pub fn list_favorites(&self, owner: &str) -> Result<Vec<HistoryEntry>> {
        self.query_history("WHERE owner_id = ?1 AND is_favorite = 1", owner)
    }

    /// Case-insensitive substring match on the name or either date spelling.
    /// An empty query returns the whole history.
    pub fn search_history(&self, owner: &str, query: &str) -> Result<Vec<HistoryEntry>> {
        let needle = query.trim().to_lowercase();
        let all = self.list_history(owner)?;
        if needle.is_empty() {
            return Ok(all);
        }
        Ok(all
            .into_iter()
            .filter(|e| {
                e.person_name.to_lowercase().contains(&needle)
                    || e.birth_date.to_display().contains(&needle)
                    || e.birth_date.to_iso().contains(&needle)
            })
            .collect())
    }

    /// Mutations are scoped to `owner`; another owner's row reads as missing.
    pub fn rename_entry(&self, owner: &str, id: Uuid, name: &str) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE history SET person_name = ?1 WHERE id = ?2 AND owner_id = ?3",
            params![display_name(name), id.to_string(), owner],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn set_favorite(&self, owner: &str, id: Uuid, favorite: bool) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE history SET is_favorite = ?1 WHERE id = ?2 AND owner_id = ?3",
            params![favorite, id.to_string(), owner],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn delete_entry(&self, owner: &str, id: Uuid) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM history WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner],
        )?;
        Ok(n > 0)
    }

    fn query_history(&self, filter: &str, arg: &str) -> Result<Vec<HistoryEntry>> {
        let sql = format!(
            "SELECT id, owner_id, person_name, birth_date, matrix_json, is_favorite, created_at
             FROM history {filter}
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([arg], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, owner_id, person_name, date, json, is_favorite, created_at)| {
                Ok(HistoryEntry {
                    id: parse_uuid(&id)?,
                    owner_id,
                    person_name,
                    birth_date: parse_date(&date)?,
                    matrix: personal_from_json(&json)?,
                    is_favorite,
                    created_at,
                })
            })
            .collect()
    }

    // --- Compatibility history ---

    /// Save a pairing unless this owner already saved the same two dates,
    /// in either order.
    pub fn save_compatibility(
        &self,
        owner: &str,
        first: (&str, BirthDate),
        second: (&str, BirthDate),
        matrix: &CompatibilityMatrix,
    ) -> Result<SaveOutcome> {
        let key = pair_id(first.1, second.1);
        if let Some(id) = self.find_pair(owner, &key)? {
            return Ok(SaveOutcome::AlreadySaved(id));
        }
        let entry = PairEntry {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            pair_id: key,
            first: Partner {
                name: display_name(first.0).to_string(),
                birth_date: first.1,
            },
            second: Partner {
                name: display_name(second.0).to_string(),
                birth_date: second.1,
            },
            matrix: *matrix,
            created_at: now_iso8601(),
        };
        insert_pair_on(&self.conn, &entry)?;
        tracing::info!(id = %entry.id, pair = %entry.pair_id, "compatibility saved");
        Ok(SaveOutcome::Saved(entry.id))
    }

    pub fn is_pair_saved(&self, owner: &str, a: BirthDate, b: BirthDate) -> Result<bool> {
        Ok(self.find_pair(owner, &pair_id(a, b))?.is_some())
    }

    fn find_pair(&self, owner: &str, key: &str) -> Result<Option<Uuid>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM compatibility_history WHERE owner_id = ?1 AND pair_id = ?2",
                params![owner, key],
                |row| row.get(0),
            )
            .optional()?;
        id.as_deref().map(parse_uuid).transpose()
    }

    /// Newest first.
    pub fn list_compatibility(&self, owner: &str) -> Result<Vec<PairEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, pair_id, name1, date1, name2, date2, matrix_json, created_at
             FROM compatibility_history WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([owner], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    (row.get::<_, String>(3)?, row.get::<_, String>(4)?),
                    (row.get::<_, String>(5)?, row.get::<_, String>(6)?),
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, owner_id, pair_id, (n1, d1), (n2, d2), json, created_at)| {
                Ok(PairEntry {
                    id: parse_uuid(&id)?,
                    owner_id,
                    pair_id,
                    first: Partner {
                        name: n1,
                        birth_date: parse_date(&d1)?,
                    },
                    second: Partner {
                        name: n2,
                        birth_date: parse_date(&d2)?,
                    },
                    matrix: compatibility_from_json(&json)?,
                    created_at,
                })
            })
            .collect()
    }

    pub fn delete_compatibility(&self, owner: &str, id: Uuid) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM compatibility_history WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner],
        )?;
        Ok(n > 0)
    }

    // --- Celebrities ---

    /// Fill the reference table on first run. Returns how many rows were
    /// inserted, which is zero once the table has any content.
    pub fn seed_celebrities(&self) -> Result<usize> {
        if self.celebrity_count()? > 0 {
            return Ok(0);
        }
        let records = seed_records();
        let tx = self.conn.unchecked_transaction()?;
        for r in &records {
            tx.execute(
                "INSERT INTO celebrities (name, birth_date, main_arcana) VALUES (?1, ?2, ?3)",
                params![r.name, r.birth_date, r.main_arcana.get()],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = records.len(), "celebrities seeded");
        Ok(records.len())
    }

    pub fn celebrity_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM celebrities", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Public figures whose main arcana equals `arcana`.
    pub fn celebrities_by_arcana(&self, arcana: Arcana) -> Result<Vec<CelebrityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, birth_date, main_arcana FROM celebrities
             WHERE main_arcana = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([arcana.get()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(name, birth_date, value)| {
                let main_arcana = u64::try_from(value)
                    .ok()
                    .and_then(|v| Arcana::try_from(v).ok())
                    .ok_or_else(|| StoreError::InvalidData(format!("arcana {value} for {name}")))?;
                Ok(CelebrityRecord {
                    name,
                    birth_date,
                    main_arcana,
                })
            })
            .collect()
    }
}

pub(crate) fn insert_history_on(conn: &Connection, entry: &HistoryEntry) -> Result<usize> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO history
         (id, owner_id, person_name, birth_date, matrix_json, is_favorite, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.id.to_string(),
            entry.owner_id,
            entry.person_name,
            entry.birth_date.to_iso(),
            personal_to_json(&entry.matrix)?,
            entry.is_favorite,
            entry.created_at,
        ],
    )?;
    Ok(n)
}

pub(crate) fn insert_pair_on(conn: &Connection, entry: &PairEntry) -> Result<usize> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO compatibility_history
         (id, owner_id, pair_id, name1, date1, name2, date2, matrix_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.id.to_string(),
            entry.owner_id,
            entry.pair_id,
            entry.first.name,
            entry.first.birth_date.to_iso(),
            entry.second.name,
            entry.second.birth_date.to_iso(),
            compatibility_to_json(&entry.matrix)?,
            entry.created_at,
        ],
    )?;
    Ok(n)
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("invalid UUID '{s}': {e}")))
}

fn parse_date(s: &str) -> Result<BirthDate> {
    BirthDate::parse(s).map_err(|e| StoreError::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_core::{build_matrix, compose};

    fn monroe() -> BirthDate {
        BirthDate::new(1926, 6, 1)
    }

    fn reeves() -> BirthDate {
        BirthDate::new(1964, 9, 2)
    }

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn test_save_and_list_roundtrip() {
        let s = store();
        let m = build_matrix(monroe());
        let outcome = s.save_matrix("me", "Marilyn", monroe(), &m).unwrap();
        assert!(outcome.is_new());

        let list = s.list_history("me").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, outcome.id());
        assert_eq!(list[0].person_name, "Marilyn");
        assert_eq!(list[0].birth_date, monroe());
        assert_eq!(list[0].matrix, m);
        assert!(!list[0].is_favorite);
    }

    #[test]
    fn test_save_dedups_by_owner_and_date() {
        let s = store();
        let m = build_matrix(monroe());
        let first = s.save_matrix("me", "A", monroe(), &m).unwrap();
        let second = s.save_matrix("me", "B", monroe(), &m).unwrap();
        assert_eq!(second, SaveOutcome::AlreadySaved(first.id()));
        assert_eq!(s.list_history("me").unwrap().len(), 1);

        // another owner gets their own copy
        assert!(s.save_matrix("you", "A", monroe(), &m).unwrap().is_new());
        assert!(s.is_matrix_saved("you", monroe()).unwrap());
        assert!(!s.is_matrix_saved("you", reeves()).unwrap());
    }

    #[test]
    fn test_blank_name_defaults() {
        let s = store();
        s.save_matrix("me", "   ", monroe(), &build_matrix(monroe()))
            .unwrap();
        assert_eq!(s.list_history("me").unwrap()[0].person_name, DEFAULT_NAME);
    }

    #[test]
    fn test_history_is_newest_first() {
        let s = store();
        s.save_matrix("me", "old", monroe(), &build_matrix(monroe()))
            .unwrap();
        s.save_matrix("me", "new", reeves(), &build_matrix(reeves()))
            .unwrap();
        let names: Vec<_> = s
            .list_history("me")
            .unwrap()
            .into_iter()
            .map(|e| e.person_name)
            .collect();
        assert_eq!(names, ["new", "old"]);
    }

    #[test]
    fn test_search_by_name_and_date() {
        let s = store();
        s.save_matrix("me", "Marilyn", monroe(), &build_matrix(monroe()))
            .unwrap();
        s.save_matrix("me", "Keanu", reeves(), &build_matrix(reeves()))
            .unwrap();

        let hits = s.search_history("me", "mari").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].person_name, "Marilyn");

        let hits = s.search_history("me", "09.1964").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].person_name, "Keanu");

        assert_eq!(s.search_history("me", "").unwrap().len(), 2);
        assert!(s.search_history("me", "nobody").unwrap().is_empty());
    }

    #[test]
    fn test_rename_and_favorite() {
        let s = store();
        let id = s
            .save_matrix("me", "x", monroe(), &build_matrix(monroe()))
            .unwrap()
            .id();
        s.rename_entry("me", id, "Norma Jeane").unwrap();
        s.set_favorite("me", id, true).unwrap();

        let favs = s.list_favorites("me").unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].person_name, "Norma Jeane");

        s.set_favorite("me", id, false).unwrap();
        assert!(s.list_favorites("me").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let s = store();
        let err = s.rename_entry("me", Uuid::new_v4(), "x").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(matches!(
            s.set_favorite("me", Uuid::new_v4(), true).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_delete_entry() {
        let s = store();
        let id = s
            .save_matrix("me", "x", monroe(), &build_matrix(monroe()))
            .unwrap()
            .id();
        assert!(s.delete_entry("me", id).unwrap());
        assert!(!s.delete_entry("me", id).unwrap());
        assert!(s.get_entry(id).unwrap().is_none());
        assert!(!s.is_matrix_saved("me", monroe()).unwrap());
    }

    #[test]
    fn test_compatibility_dedup_ignores_order() {
        let s = store();
        let c = compose(&build_matrix(monroe()), &build_matrix(reeves()));
        let first = s
            .save_compatibility("me", ("Marilyn", monroe()), ("Keanu", reeves()), &c)
            .unwrap();
        let again = s
            .save_compatibility("me", ("Keanu", reeves()), ("Marilyn", monroe()), &c)
            .unwrap();
        assert_eq!(again, SaveOutcome::AlreadySaved(first.id()));
        assert!(s.is_pair_saved("me", reeves(), monroe()).unwrap());

        let list = s.list_compatibility("me").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].pair_names(), "Marilyn + Keanu");
        assert_eq!(list[0].dates_label(), "01.06.1926 & 02.09.1964");
        assert_eq!(list[0].pair_id, "1926-06-01_1964-09-02");
        assert_eq!(list[0].matrix, c);

        assert!(s.delete_compatibility("me", first.id()).unwrap());
        assert!(s.list_compatibility("me").unwrap().is_empty());
    }

    #[test]
    fn test_other_owner_cannot_modify() {
        let s = store();
        let id = s
            .save_matrix("alice", "Marilyn", monroe(), &build_matrix(monroe()))
            .unwrap()
            .id();
        assert!(matches!(
            s.rename_entry("bob", id, "x").unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            s.set_favorite("bob", id, true).unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(!s.delete_entry("bob", id).unwrap());

        let entry = s.get_entry(id).unwrap().unwrap();
        assert_eq!(entry.person_name, "Marilyn");
        assert!(!entry.is_favorite);

        let c = compose(&build_matrix(monroe()), &build_matrix(reeves()));
        let pair = s
            .save_compatibility("alice", ("Marilyn", monroe()), ("Keanu", reeves()), &c)
            .unwrap()
            .id();
        assert!(!s.delete_compatibility("bob", pair).unwrap());
        assert_eq!(s.list_compatibility("alice").unwrap().len(), 1);
    }

    #[test]
    fn test_seed_celebrities_once() {
        let s = store();
        let n = s.seed_celebrities().unwrap();
        assert_eq!(n, dm_core::CELEBRITIES.len());
        assert_eq!(s.seed_celebrities().unwrap(), 0);
        assert_eq!(s.celebrity_count().unwrap(), n);
    }

    #[test]
    fn test_celebrities_by_monroe_center() {
        let s = store();
        s.seed_celebrities().unwrap();
        let center = build_matrix(monroe()).main_arcana();
        let matches = s.celebrities_by_arcana(center).unwrap();
        assert!(matches.iter().any(|r| r.name == "Marilyn Monroe"));
        assert!(matches.iter().all(|r| r.main_arcana == center));
    }

    #[test]
    fn test_metadata() {
        let s = store();
        assert_eq!(s.get_metadata("missing").unwrap(), None);
        s.set_metadata("k", "v").unwrap();
        assert_eq!(s.get_metadata("k").unwrap().as_deref(), Some("v"));
    }
}
