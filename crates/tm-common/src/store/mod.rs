//! Persisted record collections: vagas, candidates, prospects.
//!
//! Each collection is one JSON array on disk, replaced atomically on every
//! append. Loading tolerates a missing file (fresh deployment ⇒ empty
//! collection) but never a malformed one: that surfaces as a typed error
//! for the caller to act on instead of being logged away.

pub mod candidates;
pub mod jobs;
mod json;
pub mod prospects;

pub use candidates::{CandidateStore, CANDIDATE_ID_FLOOR};
pub use jobs::{JobStore, JOB_ID_FLOOR};
pub use prospects::ProspectLog;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record file io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Next id for a collection: one past the highest numeric id currently in
/// use, or the kind-specific floor when no record carries a numeric id yet.
pub(crate) fn next_numeric_id<'a>(ids: impl Iterator<Item = Option<&'a str>>, floor: i64) -> i64 {
    ids.flatten()
        .filter_map(|id| id.trim().parse::<i64>().ok())
        .max()
        .map(|max| max + 1)
        .unwrap_or(floor)
}
