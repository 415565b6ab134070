use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use tm_common::context::read_lock;
use tm_common::ingest::register_candidate;
use tm_common::schema::CandidateRecord;

use crate::error::ApiError;
use crate::SharedState;

use super::RegisterResponse;

pub async fn create_candidate(
    State(state): State<SharedState>,
    Json(record): Json<CandidateRecord>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let outcome = register_candidate(&state.ctx, record)?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

pub async fn get_candidate(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CandidateRecord>, ApiError> {
    fetch(&state, &id).map(Json)
}

/// Full nested document, the per-candidate download of the GUI.
pub async fn export_candidate(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let record = fetch(&state, &id)?;
    serde_json::to_value(&record)
        .map(Json)
        .map_err(|err| ApiError::Internal(err.to_string()))
}

fn fetch(state: &SharedState, id: &str) -> Result<CandidateRecord, ApiError> {
    let candidates = read_lock(&state.ctx.candidates);
    candidates
        .get(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("candidato não encontrado: {id}")))
}
