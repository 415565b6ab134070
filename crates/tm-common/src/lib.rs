//! Talent Match core: extraction, embedding, vector index, history scoring
//! and the blended ranking engine, plus the persisted record collections
//! they operate on.

pub mod context;
pub mod embedding;
pub mod extraction;
pub mod history;
pub mod index;
pub mod ingest;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod schema;
pub mod store;

/// The three record kinds the engine knows. Labels match the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum::Display)]
pub enum RecordKind {
    #[serde(rename = "vaga")]
    #[strum(serialize = "vaga")]
    Job,
    #[serde(rename = "candidato")]
    #[strum(serialize = "candidato")]
    Candidate,
    #[serde(rename = "prospect")]
    #[strum(serialize = "prospect")]
    Prospect,
}
