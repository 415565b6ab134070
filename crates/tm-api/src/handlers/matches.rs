use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use tm_common::matching::{FlatMatch, RankedCandidate};

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct MatchQuery {
    #[serde(default = "default_count")]
    pub count: usize,
    /// Blend weight override; defaults to the engine configuration.
    pub history_weight: Option<f64>,
}

const fn default_count() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: String,
    pub history_weight: f64,
    pub matches: Vec<RankedCandidate>,
}

pub async fn list_matches(
    State(state): State<SharedState>,
    Path(job_id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<MatchResponse>, ApiError> {
    let count = query.count.clamp(1, 20);
    let history_weight = query
        .history_weight
        .unwrap_or(state.engine.config().history_weight)
        .clamp(0.0, 1.0);

    let matches = state
        .engine
        .rank_candidates_for_job(&state.ctx, &job_id, count, history_weight)?;

    Ok(Json(MatchResponse {
        job_id,
        history_weight,
        matches,
    }))
}

/// Tabular projection of the same ranking, the download the GUI offers.
pub async fn export_matches(
    State(state): State<SharedState>,
    Path(job_id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<Vec<FlatMatch>>, ApiError> {
    let count = query.count.clamp(1, 20);
    let history_weight = query
        .history_weight
        .unwrap_or(state.engine.config().history_weight)
        .clamp(0.0, 1.0);

    let rows = state
        .engine
        .rank_candidates_for_job(&state.ctx, &job_id, count, history_weight)?
        .iter()
        .map(RankedCandidate::flat)
        .collect();

    Ok(Json(rows))
}
