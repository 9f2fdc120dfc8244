//! Field-name label tables
//!
//! The knowledge-base JSON uses compact Korean field names as an informal
//! schema. These tables map them to readable labels for the generated chunk
//! text. Adding a new knowledge domain means extending these tables, not the
//! flattening algorithm.

/// Venue feature keys → display labels
pub(crate) const FEATURE_LABELS: &[(&str, &str)] = &[
    ("빔프로젝터연결", "빔프로젝터 연결"),
    ("온오프라인동시중계", "온오프라인 동시 중계"),
    ("사운드세팅", "사운드 세팅"),
    ("단상노트북세팅", "단상 노트북 세팅"),
    ("카메라세팅", "카메라 세팅"),
    ("오디오세팅", "오디오 세팅"),
    ("13층사운드사용법", "13층 사운드 사용법"),
    ("14층타운홀사용법", "14층 타운홀 사용법"),
    ("사운드믹서사용법", "사운드 믹서 사용법"),
    ("PTZ카메라사용법", "PTZ 카메라 사용법"),
    ("연결방법", "연결 방법"),
    ("설정방법", "설정 방법"),
    ("주의사항", "주의사항"),
    ("해결방법", "해결방법"),
];

/// FAQ category keys → display labels
pub(crate) const FAQ_CATEGORY_LABELS: &[(&str, &str)] = &[
    ("연결관련", "연결 관련"),
    ("OBS관련", "OBS 관련"),
    ("화면관련문제", "화면 관련 문제"),
    ("노트북연결시화면인식문제", "노트북 연결 시 화면 인식 문제"),
    ("강남교육장맥북연결문제", "강남 교육장 맥북 연결 문제"),
];

/// Software-guide field keys → display labels (shared by the OBS and Zoom guides)
pub(crate) const GUIDE_FIELD_LABELS: &[(&str, &str)] = &[
    ("생성방법", "생성 방법"),
    ("접근경로", "접근 경로"),
    ("설정방법", "설정 방법"),
    ("추가방법", "추가 방법"),
    ("예시장면", "예시 장면"),
    ("주요소스유형", "주요 소스 유형"),
    ("주요기능", "주요 기능"),
    ("설정옵션", "설정 옵션"),
    ("주요효과", "주요 효과"),
    ("사용방법", "사용 방법"),
    ("설정예시", "설정 예시"),
    ("해결방법", "해결 방법"),
    ("권장설정", "권장 설정"),
    ("문제상황", "문제 상황"),
];

/// OBS guide fields whose values are rendered as itemized lists
pub(crate) const OBS_LIST_FIELDS: &[&str] = &[
    "방법",
    "생성방법",
    "접근경로",
    "설정방법",
    "추가방법",
    "예시장면",
    "주요소스유형",
    "주요기능",
    "설정옵션",
    "주요효과",
    "사용방법",
    "설정예시",
    "해결방법",
    "권장설정",
    "참고사항",
    "주의사항",
];

/// Zoom guide fields with special rendering; numbered fields get step lists,
/// the rest are comma-joined
pub(crate) const ZOOM_LIST_FIELDS: &[&str] = &[
    "방법",
    "설정방법",
    "문제상황",
    "원인",
    "해결방법",
    "주의사항",
    "확인사항",
];

/// Zoom fields rendered as numbered step lists (subset of [`ZOOM_LIST_FIELDS`])
pub(crate) const ZOOM_STEP_FIELDS: &[&str] = &["방법", "설정방법", "해결방법"];

/// Korean particles and other short function words excluded from keywords
pub(crate) const STOPWORDS: &[&str] = &[
    "은", "는", "이", "가", "을", "를", "의", "에", "에서", "로", "으로",
];

/// Look up a display label, falling back to the raw key
pub(crate) fn label_for<'a>(table: &[(&'a str, &'a str)], key: &'a str) -> &'a str {
    table
        .iter()
        .find(|(raw, _)| *raw == key)
        .map_or(key, |&(_, label)| label)
}
