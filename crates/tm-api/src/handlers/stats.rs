use axum::{extract::State, Json};

use tm_common::context::ContextStats;

use crate::SharedState;

pub async fn get_stats(State(state): State<SharedState>) -> Json<ContextStats> {
    Json(state.ctx.stats())
}
