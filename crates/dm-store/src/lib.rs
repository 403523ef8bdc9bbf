//! SQLite persistence for saved matrices, compatibility readings and the
//! celebrity reference table.

pub mod config;
pub mod data_dir;
pub mod error;
pub mod json_bridge;
pub mod schema;
pub mod store;

pub use config::{Config, DateFormat};
pub use data_dir::{DATA_DIR_ENV, DataDir, resolve_base_dir};
pub use error::{Result, StoreError};
pub use json_bridge::{Backup, ImportSummary};
pub use store::{HistoryEntry, PairEntry, Partner, SaveOutcome, Store};
