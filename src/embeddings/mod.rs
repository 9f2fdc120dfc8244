//! Embedding provider
//!
//! Turns text into fixed-length vectors for semantic comparison. Two
//! operating modes, selected once at startup and never switched back:
//!
//! - **Model mode**: the configured Ollama-compatible embedding backend.
//! - **Fallback mode**: a deterministic keyword-hash pseudo-embedding,
//!   entered when the backend cannot be reached within the configured
//!   timeout. Fallback vectors only capture exact keyword overlap, so
//!   downstream scoring leans harder on the lexical signal in this mode.


pub mod ollama;

use std::time::Duration;

use tracing::{info, warn};

use crate::chunking::extract_keywords;
use crate::config::EmbeddingConfig;
use crate::{AssistError, Result};
use ollama::OllamaClient;

/// Vector length produced by both operating modes
pub const EMBEDDING_DIMENSION: usize = 384;

#[derive(Debug)]
enum Backend {
    Model(OllamaClient),
    Fallback,
}

/// Text-to-vector capability with a degraded deterministic mode
#[derive(Debug)]
pub struct EmbeddingProvider {
    backend: Backend,
    dimension: usize,
}

impl EmbeddingProvider {
    /// Probe the configured backend and settle on an operating mode. The
    /// probe is bounded by `init_timeout_secs`; any failure or timeout
    /// selects fallback mode rather than blocking startup.
    #[inline]
    pub async fn initialize(config: &EmbeddingConfig) -> Self {
        let dimension = config.embedding_dimension;

        let client = match OllamaClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                warn!("Embedding backend misconfigured, entering fallback mode: {e:#}");
                return Self::fallback(dimension);
            }
        };

        let probe = tokio::task::spawn_blocking(move || client.health_check().map(|()| client));

        match tokio::time::timeout(Duration::from_secs(config.init_timeout_secs), probe).await {
            Ok(Ok(Ok(client))) => {
                info!("Embedding backend ready: {}", client.model());
                Self {
                    backend: Backend::Model(client),
                    dimension,
                }
            }
            Ok(Ok(Err(e))) => {
                warn!("Embedding backend unavailable, entering fallback mode: {e:#}");
                Self::fallback(dimension)
            }
            Ok(Err(e)) => {
                warn!("Embedding probe panicked, entering fallback mode: {e}");
                Self::fallback(dimension)
            }
            Err(_) => {
                warn!(
                    "Embedding backend probe exceeded {}s, entering fallback mode",
                    config.init_timeout_secs
                );
                Self::fallback(dimension)
            }
        }
    }

    /// Construct a provider pinned to fallback mode
    #[inline]
    pub fn fallback(dimension: usize) -> Self {
        Self {
            backend: Backend::Fallback,
            dimension,
        }
    }

    /// Whether the provider runs in the degraded keyword-hash mode.
    /// Fallback-mode vectors are not comparable with model-mode vectors.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self.backend, Backend::Fallback)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed text into an L2-normalized vector of [`Self::dimension`] length
    #[inline]
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match &self.backend {
            Backend::Model(client) => {
                let embedding = client
                    .generate_embedding(text)
                    .map_err(|e| AssistError::Embedding(format!("{e:#}")))?;
                Ok(l2_normalize(embedding))
            }
            Backend::Fallback => Ok(fallback_embedding(text, self.dimension)),
        }
    }
}

/// Deterministic pseudo-embedding: each extracted keyword lands in a hash
/// bucket with a rank-dependent weight, then the vector is L2-normalized.
fn fallback_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let mut embedding = vec![0.0f32; dimension];

    for (rank, keyword) in extract_keywords(text).iter().enumerate() {
        let bucket = (token_hash(keyword) as usize) % dimension;
        embedding[bucket] = 1.0 / (rank as f32 + 1.0);
    }

    l2_normalize(embedding)
}

/// 32-bit multiplicative string hash, stable across platforms and releases
fn token_hash(token: &str) -> u32 {
    token
        .chars()
        .fold(0u32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as u32))
}

pub(crate) fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 1e-12 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

/// Cosine similarity in [-1, 1]. Returns 0 when either vector is empty or
/// the dimensions differ; never errors.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot = x.mul_add(*y, dot);
        norm_a = x.mul_add(*x, norm_a);
        norm_b = y.mul_add(*y, norm_b);
    }

    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude == 0.0 { 0.0 } else { dot / magnitude }
}
