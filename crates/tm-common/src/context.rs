//! Process-wide application context.
//!
//! Built once at startup and shared by handle; holds the embedder, the
//! record collections and the two index/metadata pairs. Inserts take the
//! write lock of their index so slot assignment stays serialized; searches
//! share the read lock and never observe a half-applied insert.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::error;

use crate::embedding::{EmbedderConfig, TextEmbedder};
use crate::index::VectorStore;
use crate::store::{CandidateStore, JobStore, ProspectLog, StoreError};

/// File layout under the data and index directories.
#[derive(Debug, Clone)]
pub struct ContextPaths {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
}

impl ContextPaths {
    pub fn new(data_dir: impl Into<PathBuf>, index_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            index_dir: index_dir.into(),
        }
    }

    pub fn jobs_file(&self) -> PathBuf {
        self.data_dir.join("vagas.json")
    }

    pub fn candidates_file(&self) -> PathBuf {
        self.data_dir.join("candidatos.json")
    }

    pub fn prospects_file(&self) -> PathBuf {
        self.data_dir.join("prospects.json")
    }

    pub fn job_index_file(&self) -> PathBuf {
        self.index_dir.join("index_vagas.json")
    }

    pub fn candidate_index_file(&self) -> PathBuf {
        self.index_dir.join("index_candidatos.json")
    }

    pub fn prospect_index_file(&self) -> PathBuf {
        self.index_dir.join("index_prospects.json")
    }
}

/// Shared engine state. Index slots are `None` when the on-disk index failed
/// to load (unavailable ≠ empty): dependent operations fail fast with a
/// consistent error instead of silently matching against nothing.
pub struct EngineContext {
    pub embedder: Option<Box<dyn TextEmbedder>>,
    pub jobs: RwLock<JobStore>,
    pub candidates: RwLock<CandidateStore>,
    pub prospects: RwLock<ProspectLog>,
    pub job_index: RwLock<Option<VectorStore>>,
    pub candidate_index: RwLock<Option<VectorStore>>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ContextStats {
    pub jobs: usize,
    pub candidates: usize,
    pub prospects: usize,
    pub indexed_jobs: Option<usize>,
    pub indexed_candidates: Option<usize>,
}

impl EngineContext {
    /// Open every collection and index. Malformed record files abort startup
    /// (the operator must resolve them); an unreadable or incompatible index
    /// degrades to `None` and is reported once, here.
    pub fn open(
        paths: &ContextPaths,
        config: &EmbedderConfig,
        embedder: Option<Box<dyn TextEmbedder>>,
    ) -> Result<Self, StoreError> {
        let dimension = embedder
            .as_deref()
            .map(TextEmbedder::dimension)
            .unwrap_or(config.dimension);

        Ok(Self {
            jobs: RwLock::new(JobStore::open(paths.jobs_file())?),
            candidates: RwLock::new(CandidateStore::open(paths.candidates_file())?),
            prospects: RwLock::new(ProspectLog::open(paths.prospects_file())?),
            job_index: RwLock::new(open_index(&paths.job_index_file(), dimension)),
            candidate_index: RwLock::new(open_index(&paths.candidate_index_file(), dimension)),
            embedder,
        })
    }

    /// Fully in-memory context for tests and embedded use.
    pub fn memory(embedder: Option<Box<dyn TextEmbedder>>, dimension: usize) -> Self {
        let dimension = embedder
            .as_deref()
            .map(TextEmbedder::dimension)
            .unwrap_or(dimension);

        Self {
            embedder,
            jobs: RwLock::new(JobStore::memory()),
            candidates: RwLock::new(CandidateStore::memory()),
            prospects: RwLock::new(ProspectLog::memory()),
            job_index: RwLock::new(Some(VectorStore::memory(dimension))),
            candidate_index: RwLock::new(Some(VectorStore::memory(dimension))),
        }
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats {
            jobs: read_lock(&self.jobs).len(),
            candidates: read_lock(&self.candidates).len(),
            prospects: read_lock(&self.prospects).len(),
            indexed_jobs: read_lock(&self.job_index).as_ref().map(VectorStore::len),
            indexed_candidates: read_lock(&self.candidate_index)
                .as_ref()
                .map(VectorStore::len),
        }
    }
}

fn open_index(path: &Path, dimension: usize) -> Option<VectorStore> {
    match VectorStore::open(path, dimension) {
        Ok(store) => Some(store),
        Err(err) => {
            error!(path = %path.display(), error = %err, "index unavailable");
            None
        }
    }
}

/// Shared-lock helper that rides through poisoning: a panicked writer leaves
/// data we still prefer to serve over taking the process down.
pub fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{create_embedder, EmbedderConfig};

    #[test]
    fn memory_context_reports_empty_stats() {
        let embedder = create_embedder("hash", EmbedderConfig::default());
        let ctx = EngineContext::memory(embedder, 256);

        let stats = ctx.stats();
        assert_eq!(stats.jobs, 0);
        assert_eq!(stats.candidates, 0);
        assert_eq!(stats.indexed_candidates, Some(0));
    }

    #[test]
    fn open_starts_empty_on_a_fresh_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ContextPaths::new(dir.path().join("data"), dir.path().join("models"));
        let config = EmbedderConfig::default();
        let embedder = create_embedder("hash", config.clone());

        let ctx = EngineContext::open(&paths, &config, embedder).unwrap();
        let stats = ctx.stats();
        assert_eq!(stats.candidates, 0);
        assert_eq!(stats.indexed_jobs, Some(0));
    }

    #[test]
    fn corrupt_index_degrades_to_unavailable_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ContextPaths::new(dir.path().join("data"), dir.path().join("models"));
        std::fs::create_dir_all(&paths.index_dir).unwrap();
        std::fs::write(paths.candidate_index_file(), b"not an index").unwrap();

        let config = EmbedderConfig::default();
        let embedder = create_embedder("hash", config.clone());
        let ctx = EngineContext::open(&paths, &config, embedder).unwrap();

        assert!(read_lock(&ctx.candidate_index).is_none());
        assert!(read_lock(&ctx.job_index).is_some());
    }
}
