use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::flat::{FlatIndex, SearchHit};
use super::IndexError;

const FORMAT_VERSION: u32 = 1;

/// Metadata row: the only way to recover a caller-facing id from a slot.
/// Invariant: `entries[i].slot == i` and `entries.len() == index.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub slot: usize,
    pub original_id: String,
}

/// On-disk shape: vectors and metadata in one document so a write is a
/// single temp-file-plus-rename and the pair can never diverge on disk.
#[derive(Serialize, Deserialize)]
struct VectorStoreDoc {
    format_version: u32,
    dimension: usize,
    vectors: Vec<f32>,
    entries: Vec<SlotEntry>,
}

/// A flat index plus its slot metadata, with optional file persistence.
pub struct VectorStore {
    path: Option<PathBuf>,
    index: FlatIndex,
    entries: Vec<SlotEntry>,
}

impl VectorStore {
    /// In-memory store, mostly for tests and for the rebuild tool before its
    /// final save.
    pub fn memory(dimension: usize) -> Self {
        Self {
            path: None,
            index: FlatIndex::new(dimension),
            entries: Vec::new(),
        }
    }

    /// Empty store bound to `path`, ignoring whatever is on disk. Used by
    /// the batch rebuild, which replaces the file wholesale on persist.
    pub fn empty_at(path: impl Into<PathBuf>, dimension: usize) -> Self {
        Self {
            path: Some(path.into()),
            index: FlatIndex::new(dimension),
            entries: Vec::new(),
        }
    }

    /// Open the store at `path`, or start an empty one if the file does not
    /// exist yet. A present-but-unreadable file is an error: the caller
    /// decides whether that means "unavailable" or "abort".
    pub fn open(path: impl Into<PathBuf>, dimension: usize) -> Result<Self, IndexError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "index file absent; starting empty");
                return Ok(Self {
                    path: Some(path),
                    index: FlatIndex::new(dimension),
                    entries: Vec::new(),
                });
            }
            Err(err) => return Err(IndexError::Io { path, source: err }),
        };

        let doc: VectorStoreDoc =
            serde_json::from_slice(&bytes).map_err(|err| IndexError::Corrupt {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        if doc.format_version != FORMAT_VERSION {
            return Err(IndexError::Corrupt {
                path,
                reason: format!("unsupported format version {}", doc.format_version),
            });
        }
        if doc.dimension != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: doc.dimension,
            });
        }

        let index = FlatIndex::from_parts(doc.dimension, doc.vectors)?;
        if doc.entries.len() != index.len()
            || doc.entries.iter().enumerate().any(|(i, e)| e.slot != i)
        {
            return Err(IndexError::Corrupt {
                path,
                reason: "metadata rows do not line up with stored vectors".into(),
            });
        }

        Ok(Self {
            path: Some(path),
            index,
            entries: doc.entries,
        })
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    /// Append vector and metadata row together; returns the assigned slot.
    pub fn insert(&mut self, original_id: impl Into<String>, vector: &[f32]) -> Result<usize, IndexError> {
        let slot = self.index.push(vector)?;
        self.entries.push(SlotEntry {
            slot,
            original_id: original_id.into(),
        });
        debug_assert_eq!(self.entries.len(), self.index.len());
        Ok(slot)
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        self.index.search(query, k)
    }

    /// Caller-facing id for a slot, if the slot exists.
    pub fn resolve(&self, slot: usize) -> Option<&str> {
        self.entries.get(slot).map(|e| e.original_id.as_str())
    }

    /// Write the whole document to disk atomically (temp file + rename).
    /// A store without a path is memory-only and persists nothing.
    pub fn persist(&self) -> Result<(), IndexError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let doc = VectorStoreDoc {
            format_version: FORMAT_VERSION,
            dimension: self.index.dimension(),
            vectors: self.index.as_flat_slice().to_vec(),
            entries: self.entries.clone(),
        };
        let bytes = serde_json::to_vec(&doc).map_err(|err| IndexError::Corrupt {
            path: path.clone(),
            reason: err.to_string(),
        })?;

        write_atomic(path, &bytes).map_err(|err| IndexError::Io {
            path: path.clone(),
            source: err,
        })
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
