pub mod config;
pub mod engine;

pub use config::{RankingConfig, DEFAULT_HISTORY_WEIGHT, OVERFETCH_FACTOR};
pub use engine::{FlatMatch, MatchError, RankedCandidate, RankingEngine};
