//! Hybrid search engine
//!
//! Ranks the chunk set against a query by blending embedding-vector
//! similarity with lexical scoring: token overlap, metadata-keyword
//! overlap, domain-glossary hits, and topic-affinity bonuses. The blend
//! shifts toward the lexical side when the keyword signal is strong, which
//! also compensates for the embedding provider's degraded fallback mode.
//!
//! The engine owns one precomputed embedding per chunk; `set_chunks`
//! recomputes them in full. After that the engine is read-only and
//! `search` has no side effects beyond logging.


mod glossary;

use std::fmt;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use crate::chunking::Chunk;
use crate::config::SearchConfig;
use crate::embeddings::{EmbeddingProvider, cosine_similarity};
use crate::{AssistError, Result};
use glossary::{
    CAMERA_TERMS, OBS_TERMS, PLATFORM_TERMS, TROUBLESHOOTING_TERMS, VENUE_TERMS, ZOOM_TERMS,
    mentions_any,
};

pub(crate) use glossary::DOMAIN_GLOSSARY;

// Lexical scoring weights, lowest to highest signal strength
const CONTENT_TOKEN_WEIGHT: f32 = 1.0;
const METADATA_KEYWORD_WEIGHT: f32 = 2.0;
const GLOSSARY_TERM_WEIGHT: f32 = 3.0;
const TOPIC_AFFINITY_BONUS: f32 = 1.5;

/// One ranked hit: a chunk and its combined relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Qualitative retrieval confidence for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuality {
    Excellent,
    Good,
    Fair,
    /// Nothing relevant enough to answer from
    Insufficient,
    /// The search itself broke (embedding failure or similar)
    Failed,
}

impl SearchQuality {
    /// Whether retrieval produced usable evidence
    #[inline]
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Excellent | Self::Good | Self::Fair)
    }
}

impl fmt::Display for SearchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Insufficient => "insufficient",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Ephemeral per-query result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Ranked hits, combined score descending, at most the requested K
    pub chunks: Vec<ScoredChunk>,
    pub quality: SearchQuality,
}

impl SearchResult {
    fn empty(quality: SearchQuality) -> Self {
        Self {
            chunks: Vec::new(),
            quality,
        }
    }
}

/// In-memory ranking over a fixed chunk set
pub struct HybridSearchEngine {
    provider: Arc<EmbeddingProvider>,
    config: SearchConfig,
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

impl HybridSearchEngine {
    #[inline]
    pub fn new(provider: Arc<EmbeddingProvider>, config: SearchConfig) -> Self {
        Self {
            provider,
            config,
            chunks: Vec::new(),
            embeddings: Vec::new(),
        }
    }

    /// Replace the chunk set and recompute every chunk embedding. There is
    /// no incremental update; the knowledge base is small and loaded once.
    #[inline]
    pub fn set_chunks(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        let bar = if console::user_attended_stderr() {
            ProgressBar::new(chunks.len() as u64).with_style(
                ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding chunks")
                    .expect("style template is valid"),
            )
        } else {
            ProgressBar::hidden()
        };

        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let embedding = self
                .provider
                .embed(&chunk.content)
                .map_err(|e| AssistError::Embedding(format!("embedding chunk {}: {e}", chunk.id)))?;
            embeddings.push(embedding);
            bar.inc(1);
        }
        bar.finish_and_clear();

        info!(
            "Precomputed {} chunk embeddings ({} mode)",
            embeddings.len(),
            if self.provider.is_fallback() {
                "fallback"
            } else {
                "model"
            }
        );

        self.chunks = chunks;
        self.embeddings = embeddings;
        Ok(())
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Rank the chunk set against `query` and keep the best `top_k` hits.
    /// Never errors: an internal failure yields an empty `Failed` result.
    #[inline]
    pub fn search(&self, query: &str, top_k: usize) -> SearchResult {
        if self.chunks.is_empty() {
            debug!("Search over empty chunk set");
            return SearchResult::empty(SearchQuality::Insufficient);
        }

        let query_embedding = match self.provider.embed(query) {
            Ok(embedding) => embedding,
            Err(e) => {
                error!("Query embedding failed: {e}");
                return SearchResult::empty(SearchQuality::Failed);
            }
        };

        let query_lower = query.to_lowercase();

        let keyword_scores: Vec<f32> = self
            .chunks
            .iter()
            .map(|chunk| self.keyword_score(&query_lower, chunk))
            .collect();
        let max_keyword = keyword_scores.iter().copied().fold(0.0f32, f32::max);

        // Lean on the lexical signal when it is strong; this also covers
        // fallback-mode embeddings, whose similarities are weak
        let keyword_weight = if max_keyword > self.config.strong_keyword_threshold {
            self.config.strong_keyword_weight
        } else {
            self.config.keyword_weight
        };
        let vector_weight = 1.0 - keyword_weight;

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(&self.embeddings)
            .zip(&keyword_scores)
            .map(|((chunk, embedding), &keyword_score)| {
                let vector_score = cosine_similarity(&query_embedding, embedding).max(0.0);
                let keyword_norm =
                    (keyword_score / self.config.keyword_score_ceiling).clamp(0.0, 1.0);
                ScoredChunk {
                    chunk: chunk.clone(),
                    score: vector_weight * vector_score + keyword_weight * keyword_norm,
                }
            })
            .collect();

        // Stable sort keeps original chunk order on ties
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let quality = self.assess_quality(&query_lower, &scored);

        debug!(
            "Search '{}' -> {} hits, quality {}, keyword weight {}",
            query,
            scored.len(),
            quality,
            keyword_weight
        );

        SearchResult {
            chunks: scored,
            quality,
        }
    }

    /// Weighted lexical score: content-token overlap, metadata-keyword
    /// overlap, glossary hits, and topic-affinity bonuses
    fn keyword_score(&self, query_lower: &str, chunk: &Chunk) -> f32 {
        let content_lower = chunk.content.to_lowercase();
        let mut score = 0.0f32;

        for word in query_lower.split_whitespace() {
            if word.chars().count() > 1 && content_lower.contains(word) {
                score += CONTENT_TOKEN_WEIGHT;
            }
        }

        for keyword in &chunk.metadata.keywords {
            if query_lower.contains(&keyword.to_lowercase()) {
                score += METADATA_KEYWORD_WEIGHT;
            }
        }

        for term in DOMAIN_GLOSSARY {
            if query_lower.contains(term) && content_lower.contains(term) {
                score += GLOSSARY_TERM_WEIGHT;
            }
        }

        score + self.affinity_bonus(query_lower, chunk)
    }

    /// Bonus when the query names a recognized topic and the chunk's
    /// metadata belongs to it
    fn affinity_bonus(&self, query_lower: &str, chunk: &Chunk) -> f32 {
        let metadata = &chunk.metadata;
        let mut bonus = 0.0f32;

        if mentions_any(query_lower, TROUBLESHOOTING_TERMS)
            && (metadata.kind.as_deref() == Some("faq") || metadata.source == "checklists_and_faq")
        {
            bonus += TOPIC_AFFINITY_BONUS;
        }

        if mentions_any(query_lower, CAMERA_TERMS) {
            let camera_related = [&metadata.category, &metadata.sub_category, &metadata.section]
                .into_iter()
                .flatten()
                .any(|field| field.contains("카메라"));
            if camera_related {
                bonus += TOPIC_AFFINITY_BONUS;
            }
        }

        if mentions_any(query_lower, OBS_TERMS) && metadata.source == "obs_guide" {
            bonus += TOPIC_AFFINITY_BONUS;
        }

        if mentions_any(query_lower, ZOOM_TERMS) && metadata.source == "zoom_guide" {
            bonus += TOPIC_AFFINITY_BONUS;
        }

        if let Some(location) = &metadata.location {
            let location_lower = location.to_lowercase();
            if VENUE_TERMS
                .iter()
                .any(|venue| query_lower.contains(venue) && location_lower.contains(venue))
            {
                bonus += TOPIC_AFFINITY_BONUS;
            }
        }

        if mentions_any(query_lower, PLATFORM_TERMS) && metadata.source == "platforms" {
            bonus += TOPIC_AFFINITY_BONUS;
        }

        bonus
    }

    /// Grade the final hit list. Glossary terms shared between the query
    /// and the top chunks' text raise the grade alongside the top score.
    fn assess_quality(&self, query_lower: &str, scored: &[ScoredChunk]) -> SearchQuality {
        let Some(top) = scored.first() else {
            return SearchQuality::Insufficient;
        };

        let glossary_matches = DOMAIN_GLOSSARY
            .iter()
            .filter(|term| {
                query_lower.contains(*term)
                    && scored
                        .iter()
                        .any(|hit| hit.chunk.content.to_lowercase().contains(*term))
            })
            .count();

        if top.score >= self.config.excellent_score && glossary_matches >= 2 {
            SearchQuality::Excellent
        } else if top.score >= self.config.good_score || glossary_matches >= 1 {
            SearchQuality::Good
        } else if top.score >= self.config.fair_score {
            SearchQuality::Fair
        } else {
            SearchQuality::Insufficient
        }
    }
}
