/// Blend weight of the history score when the caller does not pass one.
pub const DEFAULT_HISTORY_WEIGHT: f64 = 0.3;

/// Retrieval over-fetch: the index is asked for `count × 5` neighbors so the
/// blended re-ranking has room to promote candidates past raw similarity.
pub const OVERFETCH_FACTOR: usize = 5;

#[derive(Debug, Clone)]
pub struct RankingConfig {
    pub history_weight: f64,
    pub overfetch_factor: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            history_weight: DEFAULT_HISTORY_WEIGHT,
            overfetch_factor: OVERFETCH_FACTOR,
        }
    }
}

impl RankingConfig {
    pub fn from_env() -> Self {
        Self {
            history_weight: std::env::var("TM_HISTORY_WEIGHT")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .map(|w| w.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_HISTORY_WEIGHT),
            overfetch_factor: std::env::var("TM_OVERFETCH_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|f| *f > 0)
                .unwrap_or(OVERFETCH_FACTOR),
        }
    }
}
