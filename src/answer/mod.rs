//! Answer grounding
//!
//! Turns retrieved chunks into the final answer. Generation is preferred,
//! but the generated text is only shown when its domain vocabulary overlaps
//! the retrieved evidence enough; otherwise a direct rendering of the top
//! chunks is substituted. Generation failures take the same substitution
//! path, so this layer never errors out.


use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::config::{AnswerConfig, GenerationConfig};
use crate::generation::Generator;
use crate::search::{DOMAIN_GLOSSARY, ScoredChunk};

/// Canned reply when retrieval produced nothing usable
pub const NO_INFORMATION_ANSWER: &str = "죄송합니다. VX 데이터에서 관련 정보를 찾을 수 없습니다. \
     더 구체적인 질문을 해주시거나 VX팀에 직접 문의해주세요.";

const INSUFFICIENT_CONTEXT_ANSWER: &str = "VX 데이터에서 해당 질문에 대한 충분한 정보를 찾을 수 \
     없습니다. 더 구체적으로 질문해주세요.";

/// How many chunks the direct rendering shows
const DIRECT_ANSWER_CHUNKS: usize = 3;

// Confidence grades per outcome
const CONFIDENCE_GENERATED: f32 = 0.9;
const CONFIDENCE_REJECTED: f32 = 0.7;
const CONFIDENCE_ERROR: f32 = 0.6;

/// Ephemeral per-query answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub answer: String,
    /// Whether the answer is backed by retrieved knowledge
    pub data_sourced: bool,
    pub confidence: f32,
    /// Originating knowledge resource names, deduplicated
    pub sources: Vec<String>,
    /// True when the direct rendering replaced a failed or ungrounded
    /// generation
    pub fallback: bool,
}

impl AnswerResult {
    fn without_data(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            data_sourced: false,
            confidence: 0.0,
            sources: Vec::new(),
            fallback: false,
        }
    }
}

/// Grounded answer construction over retrieved chunks
pub struct AnswerService {
    generator: Arc<dyn Generator>,
    config: AnswerConfig,
    max_tokens: u32,
    temperature: f32,
}

impl AnswerService {
    #[inline]
    pub fn new(
        generator: Arc<dyn Generator>,
        config: AnswerConfig,
        generation: &GenerationConfig,
    ) -> Self {
        Self {
            generator,
            config,
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
        }
    }

    /// Produce the final answer for `query` from ranked hits
    #[inline]
    pub async fn answer(&self, query: &str, hits: &[ScoredChunk]) -> AnswerResult {
        if hits.is_empty() {
            return AnswerResult::without_data(NO_INFORMATION_ANSWER);
        }

        let context = build_context(hits);
        if context.chars().count() < self.config.min_context_chars {
            debug!("Context too short ({} chars), skipping generation", context.len());
            return AnswerResult::without_data(INSUFFICIENT_CONTEXT_ANSWER);
        }

        let prompt = build_prompt(query, &context);
        let sources = source_names(hits);

        match self
            .generator
            .generate(&prompt, self.max_tokens, self.temperature)
            .await
        {
            Ok(generated) => {
                if self.is_grounded(&generated, &context) {
                    AnswerResult {
                        answer: generated,
                        data_sourced: true,
                        confidence: CONFIDENCE_GENERATED,
                        sources,
                        fallback: false,
                    }
                } else {
                    debug!("Generated answer failed the grounding gate, substituting direct answer");
                    AnswerResult {
                        answer: self.direct_answer(hits),
                        data_sourced: true,
                        confidence: CONFIDENCE_REJECTED,
                        sources,
                        fallback: true,
                    }
                }
            }
            Err(e) => {
                warn!("Generation failed, substituting direct answer: {e}");
                AnswerResult {
                    answer: self.direct_answer(hits),
                    data_sourced: true,
                    confidence: CONFIDENCE_ERROR,
                    sources,
                    fallback: true,
                }
            }
        }
    }

    /// The anti-hallucination gate: accept generated text only when its
    /// domain vocabulary covers enough of the evidence vocabulary
    fn is_grounded(&self, answer: &str, context: &str) -> bool {
        let context_terms = domain_keywords(context);
        if context_terms.is_empty() {
            return false;
        }
        let answer_terms = domain_keywords(answer);

        let overlap = context_terms
            .iter()
            .filter(|term| answer_terms.contains(*term))
            .count();
        let ratio = overlap as f32 / context_terms.len() as f32;

        ratio >= self.config.min_overlap_ratio || overlap >= self.config.min_overlap_count
    }

    /// Deterministic rendering of the top chunks with a source citation
    fn direct_answer(&self, hits: &[ScoredChunk]) -> String {
        let mut answer = String::from("🎬 VX 보유 정보:\n\n");

        for (index, hit) in hits.iter().take(DIRECT_ANSWER_CHUNKS).enumerate() {
            let snippet = truncate_chars(&hit.chunk.content, self.config.snippet_chars);
            answer.push_str(&format!("{}. {snippet}\n\n", index + 1));
        }

        answer.push_str(&format!("📚 출처: {}", source_names(hits).join(", ")));

        if hits.len() > DIRECT_ANSWER_CHUNKS {
            answer.push_str("\n\n💡 더 구체적인 질문을 하시면 더 정확한 답변을 드릴 수 있습니다.");
        }

        answer
    }
}

fn build_context(hits: &[ScoredChunk]) -> String {
    hits.iter()
        .map(|hit| format!("[{}] {}", hit.chunk.metadata.source, hit.chunk.content))
        .join("\n\n")
}

fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "당신은 VX팀의 데이터만을 사용하는 전문 어시스턴트입니다.\n\n\
         🚨 절대 규칙:\n\
         1. 아래 제공된 VX 데이터에 없는 정보는 절대 추가하지 마세요\n\
         2. 일반적인 지식이나 추측으로 답변하지 마세요\n\
         3. VX 데이터에 명시된 내용만 사용하세요\n\
         4. 답변은 5줄 이내로 간결하게 작성하세요\n\
         5. 불필요한 인사말, 서론, 반복 설명 금지\n\n\
         📋 답변 형식:\n\
         - VX 보유 정보만 명확하게 나열\n\
         - 구체적인 장비명, 수량, 상태 포함\n\
         - 이모지 활용해서 가독성 향상\n\
         - 하나의 통합된 답변으로 작성\n\n\
         사용자 질문: {query}\n\n\
         VX 데이터에서 검색된 정보:\n{context}\n\n\
         위 VX 데이터만을 바탕으로 간결하고 정확한 답변을 작성하세요. \
         VX 데이터에 없는 내용은 절대 추가하지 마세요."
    )
}

/// Glossary terms present in the text, lowercased substring match
fn domain_keywords(text: &str) -> Vec<&'static str> {
    let text_lower = text.to_lowercase();
    DOMAIN_GLOSSARY
        .iter()
        .copied()
        .filter(|term| text_lower.contains(term))
        .collect()
}

fn source_names(hits: &[ScoredChunk]) -> Vec<String> {
    hits.iter()
        .map(|hit| hit.chunk.metadata.source.clone())
        .unique()
        .collect()
}

/// Truncate on a char boundary, appending an ellipsis when shortened
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}
