use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use super::{tokenizer, EmbedError, EmbedderConfig, TextEmbedder};

// Fixed seeds keep the embedding deterministic across processes and Rust
// versions. Changing them changes every stored vector: bump the version and
// rebuild the indices.
const HASH_SEED_K0: u64 = 0x7a2e_91c4_d0b5_3f68;
const HASH_SEED_K1: u64 = 0x15ef_6ba8_c273_940d;

/// Feature-hashing embedder over word tokens.
///
/// No model files to load, O(n) in token count, and stable output for stable
/// input, which is what the index/metadata consistency tests lean on. Sign
/// hashing keeps the expected dot product of unrelated texts near zero.
pub struct HashEmbedder {
    config: EmbedderConfig,
}

impl HashEmbedder {
    pub fn new(config: EmbedderConfig) -> Self {
        let mut config = config;
        config.dimension = config.dimension.max(1);
        Self { config }
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.config.dimension
    }

    fn token_sign(&self, token: &str) -> f32 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K1, HASH_SEED_K0);
        token.hash(&mut hasher);
        if hasher.finish() % 2 == 0 { 1.0 } else { -1.0 }
    }
}

impl TextEmbedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn version(&self) -> &str {
        // Bump when the tokenizer or hashing scheme changes.
        "v1"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let tokens = tokenizer::tokenize(text);
        if tokens.is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let mut vector = vec![0.0f32; self.config.dimension];
        for token in &tokens {
            vector[self.hash_token(token)] += self.token_sign(token);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }
}
