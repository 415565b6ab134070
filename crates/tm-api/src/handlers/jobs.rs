use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use tm_common::context::read_lock;
use tm_common::ingest::register_job;
use tm_common::schema::JobRecord;

use crate::error::ApiError;
use crate::SharedState;

use super::RegisterResponse;

pub async fn create_job(
    State(state): State<SharedState>,
    Json(record): Json<JobRecord>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let outcome = register_job(&state.ctx, record)?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

pub async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, ApiError> {
    let jobs = read_lock(&state.ctx.jobs);
    jobs.get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("vaga não encontrada: {id}")))
}
