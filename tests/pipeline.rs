#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// End-to-end pipeline tests over injected collaborators: forced-fallback
// embeddings, scripted/failing generators, and in-memory knowledge documents.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use vx_assist::config::{Config, SearchConfig};
use vx_assist::embeddings::{EMBEDDING_DIMENSION, EmbeddingProvider};
use vx_assist::generation::{GenerationError, Generator};
use vx_assist::knowledge::Documents;
use vx_assist::service::{InjectedComponents, RagService};

struct ScriptedGenerator {
    response: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::new("backend down"))
    }
}

fn knowledge_fixture() -> Documents {
    let mut documents = Documents::new();
    documents.insert(
        "locations".to_string(),
        json!({
            "구름스퀘어_강남": {
                "이름": "구름스퀘어 강남",
                "설명": "VX팀의 주요 중계 장소입니다. 13층 교육장과 14층 타운홀에서 중계가 가능합니다."
            },
            "구름스퀘어_판교": {
                "이름": "구름스퀘어 판교",
                "설명": "판교 교육장으로 소규모 중계에 사용합니다."
            }
        }),
    );
    documents.insert(
        "obs_guide".to_string(),
        json!({
            "장면구성": {
                "설명": "OBS에서 장면을 구성하고 소스를 추가하는 방법",
                "생성방법": ["장면 추가 버튼을 누른다", "이름을 입력한다"]
            }
        }),
    );
    documents
}

fn deterministic_config() -> Config {
    Config {
        search: SearchConfig {
            min_top_k: 3,
            max_top_k: 3,
            ..SearchConfig::default()
        },
        ..Config::default()
    }
}

fn pipeline(documents: Documents, generator: Arc<dyn Generator>) -> RagService {
    RagService::with_components(
        deterministic_config(),
        InjectedComponents {
            documents,
            provider: Arc::new(EmbeddingProvider::fallback(EMBEDDING_DIMENSION)),
            generator,
        },
    )
}

#[tokio::test]
async fn empty_knowledge_base_behaves_like_no_information() {
    // A total document-source failure reaches the pipeline as an empty
    // document set; the system must still initialize and answer politely
    let calls = Arc::new(AtomicUsize::new(0));
    let service = pipeline(
        Documents::new(),
        Arc::new(ScriptedGenerator {
            response: "답변".to_string(),
            calls: Arc::clone(&calls),
        }),
    );

    service.initialize().await.expect("initialize must not fail");
    assert_eq!(service.chunk_count(), 0);

    for query in ["강남 중계", "OBS 설정", "아무 질문"] {
        let response = service.query(query).await;
        assert!(response.success);
        assert!(!response.data_sourced);
        assert_eq!(response.confidence, 0.0);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failing_generator_still_answers_from_evidence() {
    let service = pipeline(knowledge_fixture(), Arc::new(FailingGenerator));

    let response = service.query("강남에서 중계 준비 어떻게 해요?").await;

    assert!(response.success);
    assert!(response.data_sourced);
    assert!(response.fallback);
    assert!(response.answer.contains("1. "));
    assert!(response.answer.contains("📚 출처:"));
    assert!(response.answer.contains("구름스퀘어 강남"));
}

#[tokio::test]
async fn glossary_terms_route_queries_to_their_chunks() {
    // Fallback embeddings carry no semantics; glossary-driven keyword
    // scoring must still route each query to the right knowledge
    let service = pipeline(knowledge_fixture(), Arc::new(FailingGenerator));

    let venue = service.query("강남 중계 장소 알려줘").await;
    assert!(venue.answer.contains("구름스퀘어 강남"));

    let software = service.query("OBS 장면 구성 방법 알려줘").await;
    assert!(software.answer.contains("장면"));
    assert!(software.answer.contains("OBS") || software.answer.contains("obs_guide"));
}

#[tokio::test]
async fn grounded_generation_round_trip() {
    let calls = Arc::new(AtomicUsize::new(0));
    let service = pipeline(
        knowledge_fixture(),
        Arc::new(ScriptedGenerator {
            response: "🏢 강남 구름스퀘어는 VX팀의 주요 중계 장소입니다. 13층 교육장을 \
                       사용하세요."
                .to_string(),
            calls: Arc::clone(&calls),
        }),
    );

    let response = service.query("강남에서 중계 준비 어떻게 해요?").await;

    assert!(response.success);
    assert!(response.data_sourced);
    assert!(!response.fallback);
    assert_eq!(response.confidence, 0.9);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn response_serializes_for_transport() {
    let service = pipeline(knowledge_fixture(), Arc::new(FailingGenerator));

    let response = service.query("강남 중계").await;
    let payload = serde_json::to_value(&response).expect("response should serialize");

    assert_eq!(payload["query"], "강남 중계");
    assert!(payload["timestamp"].is_string());
    assert!(payload["confidence"].is_number());
}

#[tokio::test]
async fn repeated_queries_stay_stateless() {
    let service = pipeline(knowledge_fixture(), Arc::new(FailingGenerator));

    let first = service.query("강남 중계 장소").await;
    let second = service.query("강남 중계 장소").await;

    // Same evidence, same direct rendering; nothing leaks between queries
    assert_eq!(first.answer, second.answer);
    assert_eq!(first.confidence, second.confidence);
}
