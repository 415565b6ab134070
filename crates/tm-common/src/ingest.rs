//! Index maintenance: incremental registration and batch rebuild.
//!
//! Registration order is fixed: the record store write comes first and the
//! index insert only after it succeeded, so the index can never point at a
//! record the store does not hold. The converse — a persisted record that
//! never made it into the index — is tolerated and healed by a rebuild.

use std::sync::RwLock;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::context::{write_lock, ContextPaths, EngineContext};
use crate::embedding::{EmbedError, TextEmbedder};
use crate::extraction;
use crate::index::{IndexError, VectorStore};
use crate::schema::{CandidateRecord, JobRecord, ProspectRecord};
use crate::store::{CandidateStore, JobStore, ProspectLog, StoreError};
use crate::RecordKind;

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("modelo de embedding indisponível")]
    EmbedderUnavailable,
    #[error("falha ao gerar embedding: {0}")]
    Embedding(#[source] EmbedError),
    #[error("índice de {0} indisponível")]
    IndexUnavailable(RecordKind),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// What happened to a registered record. `NotIndexed` is a normal outcome:
/// the record is persisted, just not searchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Indexed { id: String, slot: usize },
    NotIndexed { id: String },
}

impl RegisterOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Indexed { id, .. } | Self::NotIndexed { id } => id,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }
}

/// Persist a vaga and insert it into the job index.
pub fn register_job(ctx: &EngineContext, record: JobRecord) -> Result<RegisterOutcome, RegisterError> {
    let text = extraction::job_text(&record);
    let id = write_lock(&ctx.jobs).append(record)?;
    index_registered(ctx, &ctx.job_index, RecordKind::Job, id, text)
}

/// Persist a candidate and insert them into the candidate index.
pub fn register_candidate(
    ctx: &EngineContext,
    record: CandidateRecord,
) -> Result<RegisterOutcome, RegisterError> {
    let text = extraction::candidate_text(&record);
    let id = write_lock(&ctx.candidates).append(record)?;
    index_registered(ctx, &ctx.candidate_index, RecordKind::Candidate, id, text)
}

/// Append one interaction to the prospect log. The prospect index is a
/// rebuild-only artifact, so nothing is embedded here.
pub fn register_prospect(ctx: &EngineContext, record: ProspectRecord) -> Result<(), StoreError> {
    write_lock(&ctx.prospects).append(record)
}

fn index_registered(
    ctx: &EngineContext,
    index: &RwLock<Option<VectorStore>>,
    kind: RecordKind,
    id: String,
    text: Option<String>,
) -> Result<RegisterOutcome, RegisterError> {
    let Some(text) = text else {
        info!(kind = %kind, id, "registro sem texto útil; persistido sem indexação");
        return Ok(RegisterOutcome::NotIndexed { id });
    };

    let embedder = ctx
        .embedder
        .as_deref()
        .ok_or(RegisterError::EmbedderUnavailable)?;

    let vector = match embedder.embed(&text) {
        Ok(vector) => vector,
        Err(EmbedError::EmptyInput) => {
            warn!(kind = %kind, id, "texto sem tokens úteis; persistido sem indexação");
            return Ok(RegisterOutcome::NotIndexed { id });
        }
        Err(err) => return Err(RegisterError::Embedding(err)),
    };

    let mut guard = write_lock(index);
    let store = guard.as_mut().ok_or(RegisterError::IndexUnavailable(kind))?;
    let slot = store.insert(id.clone(), &vector)?;
    store.persist()?;

    info!(kind = %kind, id, slot, "registro indexado");
    Ok(RegisterOutcome::Indexed { id, slot })
}

#[derive(Debug, Error)]
pub enum RebuildError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Per-kind tallies of one rebuild pass.
#[derive(Debug, Clone, Serialize)]
pub struct RebuildSummary {
    pub kind: RecordKind,
    pub processed: usize,
    pub indexed: usize,
    pub skipped_no_text: usize,
    pub failed: usize,
}

/// Regenerate every index from the persisted collections. Existing index
/// files are replaced atomically; records without usable text are counted
/// and skipped, and a per-record embed failure skips that record only.
pub fn rebuild_all(
    paths: &ContextPaths,
    embedder: &dyn TextEmbedder,
) -> Result<Vec<RebuildSummary>, RebuildError> {
    let jobs = JobStore::open(paths.jobs_file())?;
    let candidates = CandidateStore::open(paths.candidates_file())?;
    let prospects = ProspectLog::open(paths.prospects_file())?;
    let dimension = embedder.dimension();

    let mut summaries = Vec::with_capacity(3);

    let mut job_index = VectorStore::empty_at(paths.job_index_file(), dimension);
    summaries.push(rebuild_into(
        &mut job_index,
        RecordKind::Job,
        jobs.iter()
            .enumerate()
            .map(|(i, job)| (fallback_id(job.id.as_deref(), "vaga", i), extraction::job_text(job))),
        embedder,
    ));
    job_index.persist()?;

    let mut candidate_index = VectorStore::empty_at(paths.candidate_index_file(), dimension);
    summaries.push(rebuild_into(
        &mut candidate_index,
        RecordKind::Candidate,
        candidates.iter().enumerate().map(|(i, candidate)| {
            (
                fallback_id(candidate.id.as_deref(), "candidato", i),
                extraction::candidate_text(candidate),
            )
        }),
        embedder,
    ));
    candidate_index.persist()?;

    let mut prospect_index = VectorStore::empty_at(paths.prospect_index_file(), dimension);
    summaries.push(rebuild_into(
        &mut prospect_index,
        RecordKind::Prospect,
        prospects.all().iter().enumerate().map(|(i, prospect)| {
            (
                fallback_id(Some(prospect.candidate_id.as_str()), "prospect", i),
                extraction::prospect_text(prospect),
            )
        }),
        embedder,
    ));
    prospect_index.persist()?;

    Ok(summaries)
}

fn fallback_id(id: Option<&str>, kind_label: &str, position: usize) -> String {
    match id.map(str::trim).filter(|v| !v.is_empty()) {
        Some(id) => id.to_string(),
        None => format!("{kind_label}_{position}"),
    }
}

fn rebuild_into(
    index: &mut VectorStore,
    kind: RecordKind,
    items: impl Iterator<Item = (String, Option<String>)>,
    embedder: &dyn TextEmbedder,
) -> RebuildSummary {
    let mut summary = RebuildSummary {
        kind,
        processed: 0,
        indexed: 0,
        skipped_no_text: 0,
        failed: 0,
    };

    for (id, text) in items {
        summary.processed += 1;

        let Some(text) = text else {
            warn!(kind = %kind, id, "registro sem texto útil; não indexado");
            summary.skipped_no_text += 1;
            continue;
        };

        match embedder.embed(&text) {
            Ok(vector) => match index.insert(id.clone(), &vector) {
                Ok(_) => summary.indexed += 1,
                Err(err) => {
                    error!(kind = %kind, id, error = %err, "falha ao inserir no índice");
                    summary.failed += 1;
                }
            },
            Err(EmbedError::EmptyInput) => {
                warn!(kind = %kind, id, "texto sem tokens úteis; não indexado");
                summary.skipped_no_text += 1;
            }
            Err(err) => {
                error!(kind = %kind, id, error = %err, "falha ao gerar embedding");
                summary.failed += 1;
            }
        }
    }

    info!(
        kind = %kind,
        processed = summary.processed,
        indexed = summary.indexed,
        skipped = summary.skipped_no_text,
        failed = summary.failed,
        "índice reconstruído"
    );
    summary
}
