//! Destiny matrix engine.
//!
//! Turns a birth date into a fixed set of arcana values (1..=22) arranged on
//! two concentric squares, and merges two such matrices into a compatibility
//! matrix. Two reductions drive everything: digit folding for derivation and
//! ring wrap-around for merging.
//!
//! Zero I/O — pure arithmetic with no opinions about transport or persistence.

pub mod arcana;
pub mod celebrity;
pub mod compatibility;
pub mod constants;
pub mod date;
pub mod descriptions;
pub mod layout;
pub mod matrix;
pub mod point;
pub mod snapshot;

pub use arcana::{Arcana, ArcanaError, digit_sum, reduce, reduce_sum, ring_sum};
pub use celebrity::{CELEBRITIES, CelebrityRecord, match_center, seed_records};
pub use compatibility::{
    CompatibilityMatrix, WellbeingChannel, compatibility_for_dates, compatibility_from_strs,
    compose, pair_id,
};
pub use constants::{ARCANA_MAX, ARCANA_MIN, MIN_BIRTH_YEAR};
pub use date::{
    BirthDate, DateError, normalize_input, now_iso8601, now_unix_secs, today_utc,
    unix_to_iso8601,
};
pub use descriptions::{ArcanaDescription, describe};
pub use layout::{
    AgeLabel, CHAKRA_LEGEND, Chakra, ChakraInfo, MatrixLayout, NodeSpec, PlacedNode,
    layout_table,
};
pub use matrix::{
    AncestralSquare, PersonalMatrix, PersonalSquare, Satellites, Spheres, Wellbeing,
    build_matrix, build_matrix_from_str,
};
pub use point::{MatrixView, PointId};
pub use snapshot::{AnyMatrix, CURRENT_VERSION, SnapshotError, export_json, import_json};
