//! Chunk building
//!
//! Flattens the nested knowledge-base JSON into self-contained Korean text
//! chunks, one per catalogue item, venue feature, FAQ entry, or guide
//! section. Each knowledge source has its own flattening strategy; nested
//! subtrees are walked with a fixed depth bound so arbitrarily deep input
//! always terminates. The output is deterministic for a fixed document set.

#[cfg(test)]
mod tests;

mod labels;

use std::sync::LazyLock;

use fancy_regex::Regex;
use itertools::Itertools;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::knowledge::Documents;
use labels::{
    FAQ_CATEGORY_LABELS, FEATURE_LABELS, GUIDE_FIELD_LABELS, OBS_LIST_FIELDS, STOPWORDS,
    ZOOM_LIST_FIELDS, ZOOM_STEP_FIELDS, label_for,
};

/// Recursion bound for nested subtree flattening
pub const MAX_DEPTH: usize = 3;

/// Maximum number of keywords kept per chunk
pub const MAX_KEYWORDS: usize = 10;

/// The atomic retrieval unit: one self-contained passage of knowledge text
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Stable key derived from the source document and key path
    pub id: String,
    /// Natural-language text, never empty
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Scoring hints attached to a chunk
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkMetadata {
    /// Originating knowledge resource name
    pub source: String,
    /// Up to [`MAX_KEYWORDS`] salient tokens from the content, first
    /// occurrence order, no duplicates
    pub keywords: Vec<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub location: Option<String>,
    pub section: Option<String>,
    /// Chunk kind within its source ("main", "feature", "faq", ...)
    pub kind: Option<String>,
}

#[derive(Debug, Error)]
#[error("Malformed knowledge document '{document}' at {path}: {reason}")]
pub struct StructuralError {
    pub document: String,
    pub path: String,
    pub reason: String,
}

impl StructuralError {
    fn new(document: &str, path: &str, reason: &str) -> Self {
        Self {
            document: document.to_string(),
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Flatten every loaded document into chunks. A structurally broken document
/// is logged and skipped; the remaining documents still produce chunks.
#[inline]
pub fn build_chunks(documents: &Documents) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for (name, document) in documents {
        match process_document(name, document) {
            Ok(document_chunks) => {
                debug!("Chunked '{}' into {} chunks", name, document_chunks.len());
                chunks.extend(document_chunks);
            }
            Err(e) => {
                error!("{e}");
            }
        }
    }

    info!(
        "Built {} chunks from {} documents",
        chunks.len(),
        documents.len()
    );
    chunks
}

fn process_document(name: &str, document: &Value) -> Result<Vec<Chunk>, StructuralError> {
    let root = document
        .as_object()
        .ok_or_else(|| StructuralError::new(name, "(root)", "expected a JSON object"))?;

    match name {
        "equipment_list" => process_equipment(name, root),
        "locations" => Ok(process_locations(name, root)),
        "checklists_and_faq" => process_checklists(name, root),
        "obs_guide" => Ok(process_guide(name, "obs", root, OBS_LIST_FIELDS)),
        "zoom_guide" => Ok(process_zoom_guide(name, root)),
        "platforms" => Ok(process_platforms(name, root)),
        other => {
            debug!("No chunking strategy for document '{}', skipping", other);
            Ok(Vec::new())
        }
    }
}

/// Equipment catalogue: category → subcategory → item, one chunk per item
/// that carries a quantity field
fn process_equipment(
    source: &str,
    root: &Map<String, Value>,
) -> Result<Vec<Chunk>, StructuralError> {
    let mut chunks = Vec::new();

    let Some(inventory) = root.get("VX팀장비관리") else {
        return Ok(chunks);
    };
    let inventory = inventory.as_object().ok_or_else(|| {
        StructuralError::new(source, "VX팀장비관리", "expected a category object")
    })?;

    for (category, items) in inventory {
        let Some(items) = items.as_object() else {
            continue;
        };
        for (sub_category, sub_items) in items {
            let Some(sub_items) = sub_items.as_object() else {
                continue;
            };
            for (item_name, details) in sub_items {
                let Some(details) = details.as_object() else {
                    continue;
                };
                if !details.contains_key("수량") {
                    continue;
                }

                let content = equipment_description(item_name, details, category, sub_category);
                let keywords = extract_keywords(&content);
                chunks.push(Chunk {
                    id: format!("equipment_{category}_{sub_category}_{item_name}"),
                    content,
                    metadata: ChunkMetadata {
                        source: source.to_string(),
                        keywords,
                        category: Some(category.clone()),
                        sub_category: Some(sub_category.clone()),
                        ..ChunkMetadata::default()
                    },
                });
            }
        }
    }

    Ok(chunks)
}

fn equipment_description(
    item_name: &str,
    details: &Map<String, Value>,
    category: &str,
    sub_category: &str,
) -> String {
    let mut description =
        format!("{item_name}은(는) VX팀이 보유한 {category}의 {sub_category} 장비입니다.");

    if let Some(quantity) = details.get("수량").and_then(value_text) {
        description.push_str(&format!(" 현재 {quantity}대를 보유하고 있습니다."));
    }

    if let Some(condition) = details.get("상태").and_then(value_text) {
        description.push_str(&format!(" 모든 장비가 {condition} 상태입니다."));
    }

    if let Some(serials) = details.get("시리얼넘버").and_then(Value::as_array) {
        let serials = joined_items(serials);
        if !serials.is_empty() {
            description.push_str(&format!(" 시리얼번호: {serials}"));
        }
    }

    if let Some(parts) = details.get("구성품").and_then(Value::as_array) {
        let parts = joined_items(parts);
        if !parts.is_empty() {
            description.push_str(&format!(" 구성품: {parts}"));
        }
    }

    if let Some(specs) = details.get("스펙").and_then(value_text) {
        description.push_str(&format!(" 주요 스펙: {specs}"));
    }

    if let Some(note) = details.get("비고").and_then(value_text) {
        description.push_str(&format!(" 비고: {note}"));
    }

    description
}

/// Venue guides: one main chunk per venue plus one per feature subtree
fn process_locations(source: &str, root: &Map<String, Value>) -> Vec<Chunk> {
    const BASE_FIELDS: &[&str] = &["이름", "설명", "상세가이드링크"];

    let mut chunks = Vec::new();

    for (location_key, location) in root {
        let Some(location) = location.as_object() else {
            continue;
        };

        let location_name = location
            .get("이름")
            .and_then(value_text)
            .unwrap_or_else(|| location_key.clone());

        let mut main_text = location_name.clone();
        if let Some(description) = location.get("설명").and_then(value_text) {
            if !description.is_empty() {
                main_text.push(' ');
                main_text.push_str(&description);
            }
        }
        if let Some(link) = location.get("상세가이드링크").and_then(value_text) {
            main_text.push_str(&format!(" 상세 가이드: {link}"));
        }

        let keywords = extract_keywords(&main_text);
        chunks.push(Chunk {
            id: format!("location_{location_key}_main"),
            content: main_text,
            metadata: ChunkMetadata {
                source: source.to_string(),
                keywords,
                location: Some(location_key.clone()),
                kind: Some("main".to_string()),
                ..ChunkMetadata::default()
            },
        });

        for (feature_key, feature) in location {
            if BASE_FIELDS.contains(&feature_key.as_str()) {
                continue;
            }
            if !feature.is_object() && !feature.is_array() {
                continue;
            }

            if let Some(content) = location_feature_text(&location_name, feature_key, feature, 0) {
                let keywords = extract_keywords(&content);
                chunks.push(Chunk {
                    id: format!("location_{location_key}_{feature_key}"),
                    content,
                    metadata: ChunkMetadata {
                        source: source.to_string(),
                        keywords,
                        location: Some(location_key.clone()),
                        section: Some(feature_key.clone()),
                        kind: Some("feature".to_string()),
                        ..ChunkMetadata::default()
                    },
                });
            }
        }
    }

    chunks
}

fn location_feature_text(
    location_name: &str,
    feature_key: &str,
    feature: &Value,
    depth: usize,
) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    let feature_label = label_for(FEATURE_LABELS, feature_key);
    let mut sections = Vec::new();

    if let Value::Array(items) = feature {
        sections.push(format!(
            "{location_name}의 {feature_label}:\n{}",
            numbered_list(items)
        ));
        return join_sections(sections);
    }

    let object = feature.as_object()?;

    if let Some(description) = object.get("설명").and_then(value_text) {
        sections.push(format!("{location_name}의 {feature_label}: {description}"));
    }

    for (key, value) in object {
        if key == "설명" {
            continue;
        }

        match value {
            Value::Array(items) => {
                let label = label_for(FEATURE_LABELS, key);
                let rendered = items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, item)| {
                        if item.is_object() {
                            location_feature_text(location_name, key, item, depth + 1)
                        } else {
                            value_text(item).map(|text| format!("{}. {text}", index + 1))
                        }
                    })
                    .join("\n");
                if !rendered.is_empty() {
                    sections.push(format!("{label}:\n{rendered}"));
                }
            }
            Value::Object(_) => {
                if let Some(nested) = location_feature_text(location_name, key, value, depth + 1) {
                    sections.push(nested);
                }
            }
            Value::String(text) => {
                sections.push(format!("{}: {text}", label_for(FEATURE_LABELS, key)));
            }
            _ => {}
        }
    }

    join_sections(sections)
}

/// Checklists and FAQ: one preparation-checklist chunk plus one chunk per
/// FAQ entry
fn process_checklists(
    source: &str,
    root: &Map<String, Value>,
) -> Result<Vec<Chunk>, StructuralError> {
    let mut chunks = Vec::new();

    if let Some(checklist) = root.get("중계준비체크리스트") {
        let checklist = checklist.as_object().ok_or_else(|| {
            StructuralError::new(source, "중계준비체크리스트", "expected a checklist object")
        })?;

        let mut description = String::from("중계 준비 체크리스트:\n");

        if let Some(common) = checklist.get("공통기본준비사항").and_then(Value::as_array) {
            description.push_str("\n공통 기본 준비사항:\n");
            description.push_str(&numbered_list(common));
            description.push('\n');
        }

        if let Some(online) = checklist.get("온라인중계시추가").and_then(Value::as_array) {
            description.push_str("\n온라인 중계 시 추가사항:\n");
            description.push_str(&numbered_list(online));
            description.push('\n');
        }

        let keywords = extract_keywords(&description);
        chunks.push(Chunk {
            id: "checklist_preparation".to_string(),
            content: description,
            metadata: ChunkMetadata {
                source: source.to_string(),
                keywords,
                kind: Some("checklist".to_string()),
                ..ChunkMetadata::default()
            },
        });
    }

    if let Some(faq) = root.get("자주묻는질문FAQ") {
        let faq = faq.as_object().ok_or_else(|| {
            StructuralError::new(source, "자주묻는질문FAQ", "expected a category object")
        })?;

        for (category, entries) in faq {
            let Some(entries) = entries.as_object() else {
                continue;
            };
            for (question_key, entry) in entries {
                let Some(entry) = entry.as_object() else {
                    continue;
                };

                if let Some(content) = faq_entry_text(category, question_key, entry) {
                    let keywords = extract_keywords(&content);
                    chunks.push(Chunk {
                        id: format!("faq_{category}_{question_key}"),
                        content,
                        metadata: ChunkMetadata {
                            source: source.to_string(),
                            keywords,
                            category: Some(category.clone()),
                            kind: Some("faq".to_string()),
                            ..ChunkMetadata::default()
                        },
                    });
                }
            }
        }
    }

    Ok(chunks)
}

fn faq_entry_text(category: &str, question_key: &str, entry: &Map<String, Value>) -> Option<String> {
    let mut sections = Vec::new();
    let category_label = label_for(FAQ_CATEGORY_LABELS, category);

    let title = ["문제", "문제상황", "질문"]
        .iter()
        .find_map(|field| entry.get(*field).and_then(value_text))
        .unwrap_or_else(|| question_key.to_string());
    sections.push(format!("[{category_label}] {title}"));

    if let Some(solutions) = entry.get("해결방법") {
        for (index, solution) in as_slice(solutions).iter().enumerate() {
            match solution {
                Value::String(text) => {
                    sections.push(format!("해결방법 {}: {text}", index + 1));
                }
                Value::Object(steps) => {
                    if let Some(condition) = steps.get("조건").and_then(value_text) {
                        sections.push(format!("조건: {condition}"));
                    }
                    if let Some(method) = steps.get("방법") {
                        sections.push(format!("방법:\n{}", numbered_list(&as_slice(method))));
                    }
                }
                _ => {}
            }
        }
    }

    if let Some(causes) = entry.get("원인") {
        let causes = as_slice(causes).iter().filter_map(value_text).join(", ");
        if !causes.is_empty() {
            sections.push(format!("원인: {causes}"));
        }
    }

    if let Some(settings) = entry.get("설정경로").or_else(|| entry.get("설정방법")) {
        match settings {
            // Per-OS setting paths (Windows, macOS, ...)
            Value::Object(by_os) => {
                for (os, steps) in by_os {
                    sections.push(format!(
                        "{os} 설정 방법:\n{}",
                        numbered_list(&as_slice(steps))
                    ));
                }
            }
            other => {
                sections.push(format!("설정 방법:\n{}", numbered_list(&as_slice(other))));
            }
        }
    }

    if let Some(step_checklist) = entry.get("단계별체크리스트").and_then(Value::as_object) {
        for (step_key, step) in step_checklist {
            let Some(step) = step.as_object() else {
                continue;
            };
            if let Some(question) = step.get("질문").and_then(value_text) {
                sections.push(format!("{step_key}: {question}"));
            }
            if let Some(choices) = step.get("선택지").and_then(Value::as_array) {
                let choices = joined_items(choices);
                if !choices.is_empty() {
                    sections.push(format!("선택지: {choices}"));
                }
            }
            if let Some(condition) = step.get("조건").and_then(value_text) {
                sections.push(format!("조건: {condition}"));
            }
            if let Some(methods) = step.get("해결방법") {
                sections.push(format!("해결방법:\n{}", numbered_list(&as_slice(methods))));
            }
            if let Some(guidance) = step.get("안내멘트").and_then(value_text) {
                sections.push(format!("안내: {guidance}"));
            }
        }
    }

    if let Some(notes) = entry.get("참고사항") {
        sections.push(format!("참고사항:\n{}", numbered_list(&as_slice(notes))));
    }

    if let Some(extra) = entry.get("추가확인").and_then(value_text) {
        sections.push(format!("추가 확인: {extra}"));
    }
    if let Some(caution) = entry.get("특별주의").and_then(value_text) {
        sections.push(format!("특별 주의: {caution}"));
    }

    join_sections(sections)
}

/// Software guides (OBS): one chunk per top-level section plus one per
/// nested subsection
fn process_guide(
    source: &str,
    id_prefix: &str,
    root: &Map<String, Value>,
    list_fields: &[&str],
) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for (section, content) in root {
        let Some(content) = content.as_object() else {
            continue;
        };

        if let Some(text) = guide_section_text(section, content, list_fields, 0) {
            let keywords = extract_keywords(&text);
            chunks.push(Chunk {
                id: format!("{id_prefix}_{section}"),
                content: text,
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    keywords,
                    section: Some(section.clone()),
                    kind: Some("guide".to_string()),
                    ..ChunkMetadata::default()
                },
            });
        }

        for (subsection, subcontent) in content {
            let Some(subcontent) = subcontent.as_object() else {
                continue;
            };
            let title = format!("{section} - {subsection}");
            if let Some(text) = guide_section_text(&title, subcontent, list_fields, 0) {
                let keywords = extract_keywords(&text);
                chunks.push(Chunk {
                    id: format!("{id_prefix}_{section}_{subsection}"),
                    content: text,
                    metadata: ChunkMetadata {
                        source: source.to_string(),
                        keywords,
                        sub_category: Some(subsection.clone()),
                        section: Some(section.clone()),
                        kind: Some("subsection".to_string()),
                        ..ChunkMetadata::default()
                    },
                });
            }
        }
    }

    chunks
}

fn guide_section_text(
    title: &str,
    content: &Map<String, Value>,
    list_fields: &[&str],
    depth: usize,
) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut sections = Vec::new();

    if let Some(description) = content.get("설명").and_then(value_text) {
        sections.push(format!("{title}: {description}"));
    }

    for &field in list_fields {
        if let Some(value) = content.get(field) {
            let label = label_for(GUIDE_FIELD_LABELS, field);
            for (index, item) in as_slice(value).iter().enumerate() {
                match item {
                    Value::Object(nested) => {
                        let nested_title = format!("{label} {}", index + 1);
                        if let Some(text) =
                            guide_section_text(&nested_title, nested, list_fields, depth + 1)
                        {
                            sections.push(text);
                        }
                    }
                    other => {
                        if let Some(text) = value_text(other) {
                            sections.push(format!("{label}: {text}"));
                        }
                    }
                }
            }
        }
    }

    for (key, value) in content {
        if key == "설명" || list_fields.contains(&key.as_str()) {
            continue;
        }

        match value {
            Value::Object(nested) => {
                let nested_title = format!("{title} - {key}");
                if let Some(text) = guide_section_text(&nested_title, nested, list_fields, depth + 1)
                {
                    sections.push(text);
                }
            }
            Value::Array(items) => {
                let label = label_for(GUIDE_FIELD_LABELS, key);
                let rendered = items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, item)| match item {
                        Value::Object(nested) => guide_section_text(
                            &format!("{label} {}", index + 1),
                            nested,
                            list_fields,
                            depth + 1,
                        ),
                        other => value_text(other).map(|text| format!("{}. {text}", index + 1)),
                    })
                    .join("\n");
                if !rendered.is_empty() {
                    sections.push(format!("{label}:\n{rendered}"));
                }
            }
            Value::String(text) => {
                sections.push(format!("{}: {text}", label_for(GUIDE_FIELD_LABELS, key)));
            }
            _ => {}
        }
    }

    join_sections(sections)
}

/// Zoom guide: like the OBS guide, but step fields become numbered lists
/// and the remaining known fields are comma-joined
fn process_zoom_guide(source: &str, root: &Map<String, Value>) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for (section, content) in root {
        let Some(content) = content.as_object() else {
            continue;
        };

        let title = format!("Zoom {section}");
        if let Some(text) = zoom_section_text(&title, content, 0) {
            let keywords = extract_keywords(&text);
            chunks.push(Chunk {
                id: format!("zoom_{section}"),
                content: text,
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    keywords,
                    section: Some(section.clone()),
                    kind: Some("guide".to_string()),
                    ..ChunkMetadata::default()
                },
            });
        }

        for (subsection, subcontent) in content {
            let Some(subcontent) = subcontent.as_object() else {
                continue;
            };
            let title = format!("Zoom {section} - {subsection}");
            if let Some(text) = zoom_section_text(&title, subcontent, 0) {
                let keywords = extract_keywords(&text);
                chunks.push(Chunk {
                    id: format!("zoom_{section}_{subsection}"),
                    content: text,
                    metadata: ChunkMetadata {
                        source: source.to_string(),
                        keywords,
                        sub_category: Some(subsection.clone()),
                        section: Some(section.clone()),
                        kind: Some("subsection".to_string()),
                        ..ChunkMetadata::default()
                    },
                });
            }
        }
    }

    chunks
}

fn zoom_section_text(title: &str, content: &Map<String, Value>, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut sections = Vec::new();

    if let Some(description) = content.get("설명").and_then(value_text) {
        sections.push(format!("{title}: {description}"));
    }

    for &field in ZOOM_LIST_FIELDS {
        if let Some(value) = content.get(field) {
            let label = label_for(GUIDE_FIELD_LABELS, field);
            let items = as_slice(value);
            if ZOOM_STEP_FIELDS.contains(&field) {
                sections.push(format!("{label}:\n{}", numbered_list(&items)));
            } else {
                let joined = items.iter().filter_map(value_text).join(", ");
                if !joined.is_empty() {
                    sections.push(format!("{label}: {joined}"));
                }
            }
        }
    }

    for (key, value) in content {
        if key == "설명" || ZOOM_LIST_FIELDS.contains(&key.as_str()) {
            continue;
        }

        match value {
            Value::Object(nested) => {
                let nested_title = format!("{title} - {key}");
                if let Some(text) = zoom_section_text(&nested_title, nested, depth + 1) {
                    sections.push(text);
                }
            }
            Value::String(text) => {
                sections.push(format!("{}: {text}", label_for(GUIDE_FIELD_LABELS, key)));
            }
            _ => {}
        }
    }

    join_sections(sections)
}

/// Platform guides: one chunk per platform
fn process_platforms(source: &str, root: &Map<String, Value>) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for (platform, content) in root {
        let Some(content) = content.as_object() else {
            continue;
        };

        if let Some(text) = platform_text(platform, content, 0) {
            let keywords = extract_keywords(&text);
            chunks.push(Chunk {
                id: format!("platform_{platform}"),
                content: text,
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    keywords,
                    category: Some(platform.clone()),
                    kind: Some("guide".to_string()),
                    ..ChunkMetadata::default()
                },
            });
        }
    }

    chunks
}

fn platform_text(title: &str, content: &Map<String, Value>, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut sections = Vec::new();

    if let Some(description) = content.get("설명").and_then(value_text) {
        if depth == 0 {
            sections.push(format!("{title} 플랫폼: {description}"));
        } else {
            sections.push(format!("{title}: {description}"));
        }
    }

    for (key, value) in content {
        if key == "설명" {
            continue;
        }

        match value {
            Value::Array(items) => {
                sections.push(format!("{key}:\n{}", numbered_list(items)));
            }
            Value::Object(nested) => {
                let nested_title = format!("{title} - {key}");
                if let Some(text) = platform_text(&nested_title, nested, depth + 1) {
                    sections.push(text);
                }
            }
            Value::String(text) => {
                sections.push(format!("{key}: {text}"));
            }
            _ => {}
        }
    }

    join_sections(sections)
}

static TOKEN_CLEANER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s가-힣]").expect("token cleaner pattern is valid")
});

/// Extract up to [`MAX_KEYWORDS`] salient tokens: lowercase, strip
/// punctuation, drop single-character tokens and particles, dedup keeping
/// first-occurrence order.
#[inline]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = TOKEN_CLEANER.replace_all(&lowered, " ");

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .filter(|word| !STOPWORDS.contains(word))
        .unique()
        .map(str::to_string)
        .take(MAX_KEYWORDS)
        .collect()
}

/// Render scalar list items as "1. ..." lines, skipping non-scalar entries
fn numbered_list(items: &[Value]) -> String {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| value_text(item).map(|text| format!("{}. {text}", index + 1)))
        .join("\n")
}

/// Scalar JSON values as display text
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Treat a scalar as a one-element list so single values and arrays render
/// the same way
fn as_slice(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn joined_items(items: &[Value]) -> String {
    items.iter().filter_map(value_text).join(", ")
}

fn join_sections(sections: Vec<String>) -> Option<String> {
    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}
