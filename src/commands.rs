use anyhow::{Context, Result};
use console::style;
use tracing::info;

use crate::config::Config;
use crate::embeddings::ollama::OllamaClient;
use crate::generation::ChatCompletionClient;
use crate::knowledge::{KNOWLEDGE_RESOURCES, KnowledgeBase};
use crate::service::RagService;
use crate::service::cache::ResponseCache;

/// Answer a single question and print the result
#[inline]
pub async fn ask(question: &str) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let service = RagService::new(config);

    service
        .initialize()
        .await
        .context("Failed to initialize the RAG pipeline")?;

    let response = service.query(question).await;
    print_response(&response.answer, response.confidence, response.data_sourced);

    Ok(())
}

/// Interactive question loop with a short-lived response cache
#[inline]
pub async fn chat() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let service = RagService::new(config);

    eprintln!("{}", style("🎬 VX 중계 지원 챗봇").bold().cyan());
    eprintln!("질문을 입력하세요. 빈 입력 또는 'exit'로 종료합니다.");
    eprintln!();

    service
        .initialize()
        .await
        .context("Failed to initialize the RAG pipeline")?;

    if service.embedding_fallback() == Some(true) {
        eprintln!(
            "{}",
            style("⚠ 임베딩 백엔드를 사용할 수 없어 키워드 기반 검색으로 동작합니다.").yellow()
        );
        eprintln!();
    }

    let cache = ResponseCache::default();

    loop {
        let question: String = dialoguer::Input::new()
            .with_prompt("질문")
            .allow_empty(true)
            .interact_text()?;

        let question = question.trim().to_string();
        if question.is_empty() || question.eq_ignore_ascii_case("exit") {
            eprintln!("챗봇을 종료합니다.");
            break;
        }

        let key = ResponseCache::key(None, &question);
        if let Some(cached) = cache.get(&key) {
            info!("Serving cached response for '{}'", question);
            println!("{cached}");
            println!();
            continue;
        }

        let response = service.query(&question).await;
        cache.insert(key, response.answer.clone());
        print_response(&response.answer, response.confidence, response.data_sourced);
        println!();
    }

    Ok(())
}

/// Show backend connectivity and knowledge-base state
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("📊 VX Assist Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🔢 Embedding Backend:");
    match OllamaClient::new(&config.embedding) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Reachable ({}:{})",
                    config.embedding.host, config.embedding.port
                );
                println!("   📋 Model: {}", config.embedding.model);
            }
            Err(e) => {
                println!("   ⚠️  Unreachable, queries will use keyword fallback - {e:#}");
            }
        },
        Err(e) => {
            println!("   ❌ Misconfigured - {e:#}");
        }
    }

    println!();
    println!("🤖 Generation Backend:");
    let generation_client = ChatCompletionClient::new(&config.generation);
    if generation_client.has_api_key() {
        println!("   ✅ API key present (${})", config.generation.api_key_env);
        println!("   📋 Model: {}", config.generation.model);
    } else {
        println!(
            "   ⚠️  No API key in ${}, answers fall back to direct evidence rendering",
            config.generation.api_key_env
        );
    }

    println!();
    println!("📚 Knowledge Base ({}):", config.data_dir.display());
    let knowledge = KnowledgeBase::new(&config.data_dir);
    let documents = knowledge.load_all();
    for &resource in KNOWLEDGE_RESOURCES {
        if documents.contains_key(resource) {
            println!("   ✅ {resource}");
        } else {
            println!("   ❌ {resource} (missing or malformed)");
        }
    }

    let chunks = crate::chunking::build_chunks(&documents);
    println!();
    println!("   📄 Documents loaded: {}", documents.len());
    println!("   🧩 Chunks built: {}", chunks.len());

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'vx-assist config' to adjust backend settings");
    println!("   • Use 'vx-assist ask <question>' for a one-shot answer");
    println!("   • Use 'vx-assist chat' for an interactive session");

    Ok(())
}

fn print_response(answer: &str, confidence: f32, data_sourced: bool) {
    println!("{answer}");
    println!();

    let badge = if data_sourced {
        style(format!("신뢰도 {confidence:.1} · 데이터 기반")).green()
    } else {
        style(format!("신뢰도 {confidence:.1}")).yellow()
    };
    eprintln!("{}", badge.dim());
}
