#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Embedding dimension (powers of two keep the hash spread even).
    pub dimension: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

impl EmbedderConfig {
    pub fn from_env() -> Self {
        Self {
            dimension: std::env::var("TM_EMBED_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(256),
        }
    }
}
