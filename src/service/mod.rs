//! Query orchestration
//!
//! End-to-end single-query handling: retrieve, gate on retrieval quality,
//! ground an answer, post-format. Initialization runs exactly once even
//! under concurrent callers; queries never surface internal errors to the
//! caller.


pub mod cache;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::answer::{AnswerService, NO_INFORMATION_ANSWER};
use crate::chunking::build_chunks;
use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::generation::{ChatCompletionClient, Generator};
use crate::knowledge::{Documents, KnowledgeBase};
use crate::search::HybridSearchEngine;
use crate::{AssistError, Result};

/// Generic apology when something unexpected breaks mid-query
const PROCESSING_ERROR_ANSWER: &str =
    "죄송합니다. 처리 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// Suffix appended when an answer is cut at the line cap
const TRUNCATION_SUFFIX: &str = "💬 더 구체적으로 질문해주시면 자세히 안내해드릴게요.";

/// Greeting/closing filler stripped from generated answers
const FILLER_PHRASES: &[&str] = &[
    "안녕하세요!",
    "안녕하세요.",
    "안녕하세요",
    "감사합니다!",
    "감사합니다.",
    "감사합니다",
    "도움이 되었기를 바랍니다.",
    "추가 문의사항이 있으시면 언제든지 말씀해주세요.",
];

/// Final per-query payload handed to the transport layer
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub answer: String,
    pub data_sourced: bool,
    pub success: bool,
    pub confidence: f32,
    /// True when the direct evidence rendering replaced a failed or
    /// rejected generation
    pub fallback: bool,
    pub timestamp: DateTime<Utc>,
}

struct ServiceState {
    engine: HybridSearchEngine,
    answers: AnswerService,
    embedding_fallback: bool,
    chunk_count: usize,
    document_count: usize,
    generation_ready: bool,
}

/// The RAG pipeline behind one `query` entry point
pub struct RagService {
    config: Config,
    state: OnceCell<ServiceState>,
    injected: Option<InjectedComponents>,
}

/// Pre-built collaborators, bypassing backend probing and disk loading.
/// Used by the test harness and anywhere the pipeline runs hermetically.
pub struct InjectedComponents {
    pub documents: Documents,
    pub provider: Arc<EmbeddingProvider>,
    pub generator: Arc<dyn Generator>,
}

impl RagService {
    #[inline]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: OnceCell::new(),
            injected: None,
        }
    }

    #[inline]
    pub fn with_components(config: Config, components: InjectedComponents) -> Self {
        Self {
            config,
            state: OnceCell::new(),
            injected: Some(components),
        }
    }

    /// Load the knowledge base, settle the embedding mode, and precompute
    /// chunk embeddings. Concurrent callers share one in-flight
    /// initialization; repeated calls are no-ops.
    #[inline]
    pub async fn initialize(&self) -> Result<()> {
        self.state
            .get_or_try_init(|| self.build_state())
            .await
            .map(|_| ())
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state.get().is_some()
    }

    /// Chunk count after initialization, zero before
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.state.get().map_or(0, |state| state.chunk_count)
    }

    /// Whether the embedding provider settled into fallback mode
    #[inline]
    pub fn embedding_fallback(&self) -> Option<bool> {
        self.state.get().map(|state| state.embedding_fallback)
    }

    #[inline]
    pub fn document_count(&self) -> usize {
        self.state.get().map_or(0, |state| state.document_count)
    }

    #[inline]
    pub fn generation_ready(&self) -> Option<bool> {
        self.state.get().map(|state| state.generation_ready)
    }

    async fn build_state(&self) -> Result<ServiceState> {
        info!("Initializing RAG pipeline");

        let (documents, provider, generator, generation_ready) = match &self.injected {
            Some(components) => (
                components.documents.clone(),
                Arc::clone(&components.provider),
                Arc::clone(&components.generator),
                true,
            ),
            None => {
                let documents = KnowledgeBase::new(&self.config.data_dir).load_all();
                let provider =
                    Arc::new(EmbeddingProvider::initialize(&self.config.embedding).await);
                let client = ChatCompletionClient::new(&self.config.generation);
                let generation_ready = client.has_api_key();
                let generator: Arc<dyn Generator> = Arc::new(client);
                (documents, provider, generator, generation_ready)
            }
        };

        let chunks = build_chunks(&documents);
        let embedding_fallback = provider.is_fallback();

        let mut engine = HybridSearchEngine::new(provider, self.config.search.clone());
        engine.set_chunks(chunks)?;

        let answers = AnswerService::new(
            generator,
            self.config.answer.clone(),
            &self.config.generation,
        );

        let state = ServiceState {
            chunk_count: engine.chunk_count(),
            document_count: documents.len(),
            engine,
            answers,
            embedding_fallback,
            generation_ready,
        };

        info!(
            "RAG pipeline ready: {} documents, {} chunks, embedding mode: {}",
            state.document_count,
            state.chunk_count,
            if state.embedding_fallback {
                "fallback"
            } else {
                "model"
            }
        );

        Ok(state)
    }

    /// Answer one query. Never errors: initialization or internal failures
    /// become a `success: false` response with a generic apology.
    #[inline]
    pub async fn query(&self, text: &str) -> QueryResponse {
        match self.try_query(text).await {
            Ok(response) => response,
            Err(e) => {
                error!("Query failed: {e}");
                QueryResponse {
                    query: text.to_string(),
                    answer: PROCESSING_ERROR_ANSWER.to_string(),
                    data_sourced: false,
                    success: false,
                    confidence: 0.0,
                    fallback: false,
                    timestamp: Utc::now(),
                }
            }
        }
    }

    async fn try_query(&self, text: &str) -> Result<QueryResponse> {
        self.initialize().await?;
        let state = self
            .state
            .get()
            .ok_or_else(|| AssistError::Initialization("pipeline state missing".to_string()))?;

        // Vary answer breadth across repeated identical queries
        let top_k = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.config.search.min_top_k..=self.config.search.max_top_k)
        };

        let retrieval = state.engine.search(text, top_k);

        // Low-quality retrieval short-circuits to the canned reply; no
        // generation call is spent on it
        if !retrieval.quality.is_usable() {
            return Ok(QueryResponse {
                query: text.to_string(),
                answer: NO_INFORMATION_ANSWER.to_string(),
                data_sourced: false,
                success: true,
                confidence: 0.0,
                fallback: false,
                timestamp: Utc::now(),
            });
        }

        let answer = state.answers.answer(text, &retrieval.chunks).await;
        let formatted = post_process(&answer.answer, self.config.answer.max_answer_lines);

        Ok(QueryResponse {
            query: text.to_string(),
            answer: formatted,
            data_sourced: answer.data_sourced,
            success: true,
            confidence: answer.confidence,
            fallback: answer.fallback,
            timestamp: Utc::now(),
        })
    }
}

/// Strip filler phrases and cap the answer at `max_lines` non-empty lines
fn post_process(answer: &str, max_lines: usize) -> String {
    let mut cleaned = answer.to_string();
    for phrase in FILLER_PHRASES {
        cleaned = cleaned.replace(phrase, "");
    }

    let lines: Vec<&str> = cleaned
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() > max_lines {
        let mut capped = lines[..max_lines].join("\n");
        capped.push_str("\n\n");
        capped.push_str(TRUNCATION_SUFFIX);
        capped
    } else {
        cleaned.trim().to_string()
    }
}
