use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use tm_common::ingest::register_prospect;
use tm_common::schema::ProspectRecord;

use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct ProspectResponse {
    pub total: usize,
}

pub async fn create_prospect(
    State(state): State<SharedState>,
    Json(record): Json<ProspectRecord>,
) -> Result<(StatusCode, Json<ProspectResponse>), ApiError> {
    if record.candidate_id.trim().is_empty() {
        return Err(ApiError::BadRequest("candidate_id é obrigatório".into()));
    }

    register_prospect(&state.ctx, record)?;
    let total = state.ctx.stats().prospects;
    Ok((StatusCode::CREATED, Json(ProspectResponse { total })))
}
