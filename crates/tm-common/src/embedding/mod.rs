//! Text embedding behind a single trait so the ranking engine never depends
//! on a concrete model.
//!
//! The embedder is selected once at startup and lives in the application
//! context for the process lifetime. A disabled or failed load leaves the
//! context without an embedder; every embedding-dependent operation then
//! fails fast with its own "unavailable" error instead of retrying the load.

pub mod config;
pub mod hash_embedder;
pub mod tokenizer;

pub use config::EmbedderConfig;
pub use hash_embedder::HashEmbedder;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum EmbedError {
    /// The input had no usable tokens. Distinct from a model failure: the
    /// record simply cannot be made searchable.
    #[error("embedding input has no usable text")]
    EmptyInput,
    /// The model rejected this specific input. Per-call, not a load failure;
    /// the caller may retry the whole request.
    #[error("embedding generation failed: {0}")]
    Failed(String),
}

/// Opaque text→vector model. The dimension is fixed for the process
/// lifetime; every index built against this embedder shares it.
pub trait TextEmbedder: Send + Sync {
    /// Implementation name, recorded in logs next to the version.
    fn name(&self) -> &'static str;

    /// Model generation. Bumped whenever stored vectors become incompatible.
    fn version(&self) -> &str;

    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Build an embedder by name. Unknown names fall back to the hash embedder;
/// "off" yields `None`, which downgrades every embedding-dependent feature
/// to an explicit unavailable error.
pub fn create_embedder(name: &str, config: EmbedderConfig) -> Option<Box<dyn TextEmbedder>> {
    match name {
        "hash" => Some(Box::new(HashEmbedder::new(config))),
        "off" | "none" | "disabled" => None,
        other => {
            warn!(embedder = other, "unknown embedder name; using hash");
            Some(Box::new(HashEmbedder::new(config)))
        }
    }
}

/// Resolve embedder selection from `TM_EMBEDDER` / `TM_EMBED_DIMENSION`.
pub fn load_embedder_from_env() -> (EmbedderConfig, Option<Box<dyn TextEmbedder>>) {
    let config = EmbedderConfig::from_env();
    let name = std::env::var("TM_EMBEDDER").unwrap_or_else(|_| "hash".into());
    let embedder = create_embedder(&name, config.clone());

    if let Some(e) = &embedder {
        info!(
            embedder = e.name(),
            version = e.version(),
            dimension = e.dimension(),
            "embedder loaded"
        );
    } else {
        warn!(requested = %name, "embedder disabled; matching operations will be unavailable");
    }

    (config, embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_honors_off_and_falls_back_on_unknown_names() {
        assert!(create_embedder("off", EmbedderConfig::default()).is_none());

        let fallback = create_embedder("mpnet-large", EmbedderConfig::default()).unwrap();
        assert_eq!(fallback.name(), "hash");
    }

    #[test]
    fn factory_respects_configured_dimension() {
        let e = create_embedder("hash", EmbedderConfig { dimension: 64 }).unwrap();
        assert_eq!(e.dimension(), 64);
        assert_eq!(e.embed("texto de teste").unwrap().len(), 64);
    }
}
