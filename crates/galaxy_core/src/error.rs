//! Error taxonomy shared by every galaxy crate.
//!
//! All failures are deterministic: the same input always fails the same way,
//! so nothing here is worth retrying.

use crate::seed::{Seed, SeedKindTag};
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the galaxy crates.
pub type Result<T> = std::result::Result<T, GalaxyError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GalaxyError {
    /// Chunk indices outside the addressable ranges.
    #[error("chunk ({r}, {theta}, {z}) is outside the addressable range")]
    InvalidCoordinate { r: i64, theta: i64, z: i64 },

    /// A chunk id string that is not of the form `R_Theta_Z`.
    #[error("malformed chunk id {0:?}, expected \"R_Theta_Z\"")]
    InvalidChunkId(String),

    /// Object index that does not fit the index field.
    #[error("object index {0} does not fit the seed index field")]
    InvalidIndex(u64),

    /// The seed decodes cleanly but no object lives there.
    #[error("no object at seed {seed}{}", suppressed_note(.suppressed))]
    NotFound { seed: Seed, suppressed: bool },

    /// The seed names a different kind of object than the accessor serves.
    #[error("seed {seed} is a {found} seed, expected {expected}")]
    WrongAccessor {
        seed: Seed,
        expected: SeedKindTag,
        found: SeedKindTag,
    },

    /// No catalog entry matched any name resolution strategy.
    #[error("no catalog star matches {0:?}")]
    CatalogLookupFailure(String),

    /// Catalog tables were missing or unreadable.
    #[error("failed to load catalog table {path:?}: {reason}")]
    DataLoadFailure { path: PathBuf, reason: String },
}

fn suppressed_note(suppressed: &bool) -> &'static str {
    if *suppressed {
        " (replaced by catalog data)"
    } else {
        ""
    }
}

impl GalaxyError {
    /// Only data load failures have a recovery path (run with an empty catalog).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GalaxyError::DataLoadFailure { .. })
    }
}
