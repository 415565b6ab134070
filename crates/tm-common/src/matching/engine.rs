use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::context::{read_lock, EngineContext};
use crate::embedding::EmbedError;
use crate::extraction;
use crate::history::{history_score, normalize_history_score};
use crate::index::IndexError;
use crate::schema::CandidateRecord;

use super::config::RankingConfig;

const NAME_PLACEHOLDER: &str = "Nome não disponível";
const FIELD_PLACEHOLDER: &str = "Não informado";

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("vaga não encontrada: {0}")]
    JobNotFound(String),
    #[error("vaga {0} não possui texto útil para a busca")]
    InsufficientJobData(String),
    #[error("modelo de embedding indisponível")]
    EmbedderUnavailable,
    #[error("falha ao gerar embedding da vaga: {0}")]
    Embedding(#[source] EmbedError),
    #[error("índice de candidatos indisponível")]
    IndexUnavailable,
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// One ranked candidate: blended score, the display columns the UI shows,
/// and the full record for export.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub candidate_id: String,
    /// Blended adherence score, 0–100.
    pub final_score: f64,
    /// Batch-relative similarity, 0–100. Diagnostic only.
    pub similarity_score: f64,
    /// Raw history mean, −10..+10. Diagnostic only.
    pub history_score: f64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub professional_title: String,
    /// Raw L2 distance from the retrieval step, kept for reference.
    pub distance: f32,
    /// Full record backing both export shapes.
    pub record: CandidateRecord,
}

/// Tabular projection of a ranked candidate.
#[derive(Debug, Clone, Serialize)]
pub struct FlatMatch {
    pub candidate_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub professional_title: String,
    pub final_score: f64,
    pub distance: f32,
}

impl RankedCandidate {
    pub fn flat(&self) -> FlatMatch {
        FlatMatch {
            candidate_id: self.candidate_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            professional_title: self.professional_title.clone(),
            final_score: self.final_score,
            distance: self.distance,
        }
    }

    /// Nested export document (per-candidate download).
    pub fn export_document(&self) -> serde_json::Value {
        serde_json::to_value(&self.record).unwrap_or(serde_json::Value::Null)
    }
}

/// Retrieval + history blending for one vaga.
pub struct RankingEngine {
    config: RankingConfig,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank candidates for a vaga.
    ///
    /// Over-fetches `count × overfetch_factor` neighbors, blends the
    /// batch-relative similarity with the normalized history score at
    /// `history_weight`, and returns the top `count` in descending blended
    /// score. An empty index yields an empty list; a missing vaga, an
    /// unextractable vaga, or an unavailable embedder/index yield their own
    /// typed error. Candidates present in the index metadata but missing
    /// from the store are skipped, never fatal.
    pub fn rank_candidates_for_job(
        &self,
        ctx: &EngineContext,
        job_id: &str,
        count: usize,
        history_weight: f64,
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        let history_weight = history_weight.clamp(0.0, 1.0);

        let job_text = {
            let jobs = read_lock(&ctx.jobs);
            let job = jobs
                .get(job_id)
                .ok_or_else(|| MatchError::JobNotFound(job_id.to_string()))?;
            extraction::job_text(job)
                .ok_or_else(|| MatchError::InsufficientJobData(job_id.to_string()))?
        };

        let embedder = ctx
            .embedder
            .as_deref()
            .ok_or(MatchError::EmbedderUnavailable)?;
        let query = embedder.embed(&job_text).map_err(MatchError::Embedding)?;

        let k = count.saturating_mul(self.config.overfetch_factor).max(count);
        let retrieved: Vec<(String, f32)> = {
            let guard = read_lock(&ctx.candidate_index);
            let index = guard.as_ref().ok_or(MatchError::IndexUnavailable)?;
            index
                .search(&query, k)?
                .into_iter()
                .filter_map(|hit| match index.resolve(hit.slot) {
                    Some(id) => Some((id.to_string(), hit.distance)),
                    None => {
                        warn!(slot = hit.slot, "search hit without metadata row; skipping");
                        None
                    }
                })
                .collect()
        };

        if retrieved.is_empty() {
            debug!(job_id, "no neighbors retrieved");
            return Ok(Vec::new());
        }

        // Similarity is relative to this retrieval batch: the farthest
        // neighbor anchors 0 and an exact match anchors 100.
        let max_distance = retrieved
            .iter()
            .map(|(_, d)| *d as f64)
            .filter(|d| *d >= 0.0)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_distance = if max_distance.is_finite() { max_distance } else { 1.0 };

        let candidates = read_lock(&ctx.candidates);
        let prospects = read_lock(&ctx.prospects);

        let mut ranked: Vec<RankedCandidate> = Vec::with_capacity(retrieved.len());
        for (candidate_id, distance) in retrieved {
            let Some(record) = candidates.get(&candidate_id) else {
                warn!(
                    candidate_id,
                    "candidato indexado sem registro completo; ignorando"
                );
                continue;
            };

            let similarity_score = if max_distance > 0.0 {
                (1.0 - distance as f64 / max_distance) * 100.0
            } else if distance == 0.0 {
                100.0
            } else {
                0.0
            };

            let raw_history = history_score(&candidate_id, prospects.all());
            let normalized_history = normalize_history_score(raw_history);

            let final_score = (similarity_score * (1.0 - history_weight)
                + normalized_history * history_weight)
                .clamp(0.0, 100.0);

            ranked.push(build_ranked(
                candidate_id,
                final_score,
                similarity_score,
                raw_history,
                distance,
                record.clone(),
            ));
        }

        // Stable sort: ties keep retrieval (distance) order.
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(count);
        Ok(ranked)
    }
}

fn build_ranked(
    candidate_id: String,
    final_score: f64,
    similarity_score: f64,
    history_score: f64,
    distance: f32,
    record: CandidateRecord,
) -> RankedCandidate {
    let basic = record.basic_info.as_ref();
    let professional = record.professional_info.as_ref();

    let display = |value: Option<&str>, placeholder: &str| -> String {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => placeholder.to_string(),
        }
    };

    RankedCandidate {
        name: display(basic.and_then(|b| b.name.as_deref()), NAME_PLACEHOLDER),
        email: display(basic.and_then(|b| b.email.as_deref()), FIELD_PLACEHOLDER),
        phone: display(basic.and_then(|b| b.phone.as_deref()), FIELD_PLACEHOLDER),
        professional_title: display(
            professional.and_then(|p| p.professional_title.as_deref()),
            FIELD_PLACEHOLDER,
        ),
        candidate_id,
        final_score,
        similarity_score,
        history_score,
        distance,
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::write_lock;
    use crate::embedding::TextEmbedder;
    use crate::schema::{BasicInfo, JobRecord, ProspectRecord};

    /// Maps a leading marker token to a fixed axis so tests can place
    /// records at exact distances from each other.
    struct AxisEmbedder;

    impl TextEmbedder for AxisEmbedder {
        fn name(&self) -> &'static str {
            "axis"
        }

        fn version(&self) -> &str {
            "test"
        }

        fn dimension(&self) -> usize {
            4
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            let mut v = vec![0.0f32; 4];
            match text.split_whitespace().next() {
                Some("alpha") | Some("Vaga:") => v[0] = 1.0,
                Some("beta") => v[1] = 1.0,
                Some("gamma") => v[2] = 1.0,
                _ => v[3] = 1.0,
            }
            Ok(v)
        }
    }

    fn ctx_with_axis() -> EngineContext {
        EngineContext::memory(Some(Box::new(AxisEmbedder)), 4)
    }

    fn add_job(ctx: &EngineContext, title: &str) -> String {
        write_lock(&ctx.jobs)
            .append(JobRecord {
                title: Some(title.into()),
                ..JobRecord::default()
            })
            .unwrap()
    }

    fn add_candidate(ctx: &EngineContext, name: &str, vector: &[f32]) -> String {
        let id = write_lock(&ctx.candidates)
            .append(CandidateRecord {
                cv_text: Some(format!("cv de {name}")),
                basic_info: Some(BasicInfo {
                    name: Some(name.into()),
                    ..BasicInfo::default()
                }),
                ..CandidateRecord::default()
            })
            .unwrap();
        let mut guard = write_lock(&ctx.candidate_index);
        guard.as_mut().unwrap().insert(id.clone(), vector).unwrap();
        id
    }

    fn add_prospect(ctx: &EngineContext, candidate_id: &str, status: &str) {
        write_lock(&ctx.prospects)
            .append(ProspectRecord {
                candidate_id: candidate_id.into(),
                status: Some(status.into()),
                ..ProspectRecord::default()
            })
            .unwrap();
    }

    #[test]
    fn empty_index_returns_empty_list_not_error() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");

        let engine = RankingEngine::default();
        let result = engine
            .rank_candidates_for_job(&ctx, &job_id, 5, 0.3)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn unknown_job_is_not_found() {
        let ctx = ctx_with_axis();
        let engine = RankingEngine::default();

        assert!(matches!(
            engine.rank_candidates_for_job(&ctx, "9999", 5, 0.3),
            Err(MatchError::JobNotFound(id)) if id == "9999"
        ));
    }

    #[test]
    fn job_without_text_is_insufficient_data() {
        let ctx = ctx_with_axis();
        let job_id = write_lock(&ctx.jobs).append(JobRecord::default()).unwrap();

        let engine = RankingEngine::default();
        assert!(matches!(
            engine.rank_candidates_for_job(&ctx, &job_id, 5, 0.3),
            Err(MatchError::InsufficientJobData(_))
        ));
    }

    #[test]
    fn missing_embedder_fails_fast() {
        let ctx = EngineContext::memory(None, 4);
        let job_id = add_job(&ctx, "alpha");

        let engine = RankingEngine::default();
        assert!(matches!(
            engine.rank_candidates_for_job(&ctx, &job_id, 5, 0.3),
            Err(MatchError::EmbedderUnavailable)
        ));
    }

    #[test]
    fn unavailable_index_is_distinct_from_empty() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        *write_lock(&ctx.candidate_index) = None;

        let engine = RankingEngine::default();
        assert!(matches!(
            engine.rank_candidates_for_job(&ctx, &job_id, 5, 0.3),
            Err(MatchError::IndexUnavailable)
        ));
    }

    #[test]
    fn exact_match_scores_100_and_farthest_scores_0_with_zero_weight() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        // Query axis is e0: distances 0.0 and 2.0.
        let near = add_candidate(&ctx, "Perto", &[1.0, 0.0, 0.0, 0.0]);
        let far = add_candidate(&ctx, "Longe", &[-1.0, 0.0, 0.0, 0.0]);

        let engine = RankingEngine::default();
        let ranked = engine
            .rank_candidates_for_job(&ctx, &job_id, 5, 0.0)
            .unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate_id, near);
        assert_eq!(ranked[0].similarity_score, 100.0);
        assert_eq!(ranked[0].final_score, 100.0);
        assert_eq!(ranked[1].candidate_id, far);
        assert_eq!(ranked[1].similarity_score, 0.0);
        assert_eq!(ranked[1].distance, 2.0);
    }

    #[test]
    fn result_is_truncated_to_count_without_padding() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        add_candidate(&ctx, "Única", &[1.0, 0.0, 0.0, 0.0]);

        let engine = RankingEngine::default();
        let ranked = engine
            .rank_candidates_for_job(&ctx, &job_id, 3, 0.3)
            .unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn history_weight_reorders_similar_candidates() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        // Equidistant from the query so similarity ties.
        let hired = add_candidate(&ctx, "Contratada", &[0.0, 1.0, 0.0, 0.0]);
        let rejected = add_candidate(&ctx, "Rejeitada", &[0.0, 0.0, 1.0, 0.0]);
        add_prospect(&ctx, &hired, "Contratado");
        add_prospect(&ctx, &rejected, "Não Atende aos Requisitos");

        let engine = RankingEngine::default();
        let ranked = engine
            .rank_candidates_for_job(&ctx, &job_id, 5, 1.0)
            .unwrap();

        assert_eq!(ranked[0].candidate_id, hired);
        assert_eq!(ranked[0].final_score, 100.0);
        assert_eq!(ranked[1].final_score, 0.0);
    }

    #[test]
    fn blended_score_stays_within_bounds_for_any_weight() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        let id = add_candidate(&ctx, "Ana", &[1.0, 0.0, 0.0, 0.0]);
        add_candidate(&ctx, "Bia", &[0.0, 1.0, 0.0, 0.0]);
        add_prospect(&ctx, &id, "Contratado");

        let engine = RankingEngine::default();
        for weight in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for candidate in engine
                .rank_candidates_for_job(&ctx, &job_id, 5, weight)
                .unwrap()
            {
                assert!((0.0..=100.0).contains(&candidate.final_score));
            }
        }
    }

    #[test]
    fn indexed_candidate_without_record_is_skipped() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        add_candidate(&ctx, "Real", &[1.0, 0.0, 0.0, 0.0]);
        {
            let mut guard = write_lock(&ctx.candidate_index);
            guard
                .as_mut()
                .unwrap()
                .insert("77777", &[0.9, 0.0, 0.0, 0.0])
                .unwrap();
        }

        let engine = RankingEngine::default();
        let ranked = engine
            .rank_candidates_for_job(&ctx, &job_id, 5, 0.0)
            .unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Real");
    }

    #[test]
    fn display_fields_fall_back_to_placeholders() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        let id = write_lock(&ctx.candidates)
            .append(CandidateRecord {
                cv_text: Some("sem contato".into()),
                ..CandidateRecord::default()
            })
            .unwrap();
        write_lock(&ctx.candidate_index)
            .as_mut()
            .unwrap()
            .insert(id, &[1.0, 0.0, 0.0, 0.0])
            .unwrap();

        let engine = RankingEngine::default();
        let ranked = engine
            .rank_candidates_for_job(&ctx, &job_id, 1, 0.3)
            .unwrap();

        assert_eq!(ranked[0].name, "Nome não disponível");
        assert_eq!(ranked[0].email, "Não informado");
        assert_eq!(ranked[0].professional_title, "Não informado");
    }

    #[test]
    fn flat_projection_carries_the_display_columns() {
        let ctx = ctx_with_axis();
        let job_id = add_job(&ctx, "alpha");
        add_candidate(&ctx, "Ana", &[1.0, 0.0, 0.0, 0.0]);

        let engine = RankingEngine::default();
        let ranked = engine
            .rank_candidates_for_job(&ctx, &job_id, 1, 0.3)
            .unwrap();

        let flat = ranked[0].flat();
        assert_eq!(flat.name, "Ana");
        assert_eq!(flat.final_score, ranked[0].final_score);

        let doc = ranked[0].export_document();
        assert_eq!(doc["basic_info"]["name"], "Ana");
    }
}
