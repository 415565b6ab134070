use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use tracing::error;

use tm_common::ingest::RegisterError;
use tm_common::matching::MatchError;
use tm_common::store::StoreError;

fn sanitize_message(message: &str) -> String {
    const MAX_LEN: usize = 240;

    let mut cleaned = message
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();

    cleaned = cleaned
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
        cleaned.push('…');
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();

        error!(code, status = %status, error = %self, "api_error");

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Storage(_) => "storage_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::ServiceUnavailable(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Storage(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(value: MatchError) -> Self {
        match value {
            MatchError::JobNotFound(_) => ApiError::NotFound(value.to_string()),
            MatchError::InsufficientJobData(_) => ApiError::BadRequest(value.to_string()),
            MatchError::EmbedderUnavailable | MatchError::IndexUnavailable => {
                ApiError::ServiceUnavailable(value.to_string())
            }
            MatchError::Embedding(_) | MatchError::Index(_) => ApiError::Internal(value.to_string()),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(value: RegisterError) -> Self {
        match value {
            RegisterError::EmbedderUnavailable | RegisterError::IndexUnavailable(_) => {
                ApiError::ServiceUnavailable(value.to_string())
            }
            RegisterError::Store(err) => err.into(),
            RegisterError::Embedding(_) | RegisterError::Index(_) => {
                ApiError::Internal(value.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::Storage(value.to_string())
    }
}
