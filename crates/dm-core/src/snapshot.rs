//! JSON snapshot format for matrices.
//!
//! Field names are camelCase (`topS1`, `bottomLeftS2`, `pAy`), matching what
//! consumers persist verbatim. Every value is validated on the way in, so a
//! snapshot with a 0 or 23 anywhere is rejected instead of producing an
//! out-of-range [`Arcana`](crate::Arcana).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compatibility::CompatibilityMatrix;
use crate::matrix::PersonalMatrix;

pub const CURRENT_VERSION: &str = "1.0";

#[derive(Debug)]
pub struct SnapshotError(serde_json::Error);

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid matrix snapshot: {}", self.0)
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError(e)
    }
}

/// Either kind of matrix, tagged for self-describing exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "matrix", rename_all = "lowercase")]
pub enum AnyMatrix {
    Personal(PersonalMatrix),
    Compatibility(CompatibilityMatrix),
}

pub fn personal_to_json(matrix: &PersonalMatrix) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(matrix)?)
}

pub fn personal_from_json(json: &str) -> Result<PersonalMatrix, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

pub fn compatibility_to_json(matrix: &CompatibilityMatrix) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(matrix)?)
}

pub fn compatibility_from_json(json: &str) -> Result<CompatibilityMatrix, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

/// Pretty, tagged export of either matrix kind.
pub fn export_json(matrix: &AnyMatrix) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(matrix)?)
}

pub fn import_json(json: &str) -> Result<AnyMatrix, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}
