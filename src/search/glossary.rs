//! Domain vocabulary used by relevance scoring
//!
//! Equipment models, venues, and software names the team actually asks
//! about. Glossary hits are the strongest lexical signal; topic term lists
//! drive the category-affinity bonus.

/// Fixed domain vocabulary, matched case-insensitively as substrings
pub(crate) const DOMAIN_GLOSSARY: &[&str] = &[
    "vx",
    "a7s3",
    "fx3",
    "소니",
    "sony",
    "aputure",
    "강남",
    "판교",
    "obs",
    "zoom",
    "카메라",
    "렌즈",
    "마이크",
    "조명",
    "삼각대",
    "uwp-d21",
    "맥북",
    "캡처보드",
    "중계",
    "방송",
    "촬영",
    "장비",
];

/// Symptom wording that marks a troubleshooting question
pub(crate) const TROUBLESHOOTING_TERMS: &[&str] = &[
    "안나와", "안돼", "문제", "오류", "이상", "안들려", "느려", "끊겨", "검은색",
];

pub(crate) const CAMERA_TERMS: &[&str] = &["카메라", "캡처보드", "웹캠", "ptz", "a7s3", "fx3"];

pub(crate) const OBS_TERMS: &[&str] = &["obs"];

pub(crate) const ZOOM_TERMS: &[&str] = &["zoom", "줌"];

pub(crate) const VENUE_TERMS: &[&str] = &["강남", "판교", "카카오", "구름스퀘어"];

pub(crate) const PLATFORM_TERMS: &[&str] = &["유튜브", "구글미트", "페이스북"];

/// True when any of `terms` occurs in the (lowercased) text
pub(crate) fn mentions_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}
