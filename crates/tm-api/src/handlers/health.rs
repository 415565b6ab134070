use std::sync::atomic::Ordering;

use axum::extract::State;

use crate::error::ApiError;
use crate::SharedState;

pub async fn livez() -> &'static str {
    "ok"
}

pub async fn readyz(State(state): State<SharedState>) -> Result<&'static str, ApiError> {
    if state.readiness.load(Ordering::SeqCst) {
        Ok("ok")
    } else {
        Err(ApiError::ServiceUnavailable("shutting down".into()))
    }
}
