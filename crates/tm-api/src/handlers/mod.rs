pub mod candidates;
pub mod health;
pub mod jobs;
pub mod matches;
pub mod prospects;
pub mod stats;

use serde::Serialize;

use tm_common::ingest::RegisterOutcome;

/// Body returned by every registration endpoint: the assigned id and
/// whether the record became searchable.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub indexed: bool,
}

impl From<RegisterOutcome> for RegisterResponse {
    fn from(outcome: RegisterOutcome) -> Self {
        Self {
            indexed: outcome.is_indexed(),
            id: outcome.id().to_string(),
        }
    }
}
