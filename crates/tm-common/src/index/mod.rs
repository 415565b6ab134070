//! Append-only nearest-neighbor index.
//!
//! [`FlatIndex`] is the exact-search vector array; [`VectorStore`] pairs it
//! with the slot→original-id metadata table and persists both as one
//! document, so a write can never land in one and miss the other.

pub mod flat;
pub mod store;

pub use flat::{FlatIndex, SearchHit};
pub use store::{SlotEntry, VectorStore};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("index io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("index document at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}
