use super::*;
use serde_json::json;

fn documents_from(entries: &[(&str, Value)]) -> Documents {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn equipment_fixture() -> Value {
    json!({
        "VX팀장비관리": {
            "카메라": {
                "미러리스": {
                    "A7S3": {
                        "수량": 2,
                        "상태": "정상",
                        "시리얼넘버": ["SN-001", "SN-002"],
                        "구성품": ["배터리", "충전기"],
                        "스펙": "4K 120fps",
                    },
                    "FX3": {"수량": 1}
                }
            },
            "오디오": {
                "무선마이크": {
                    "UWP-D21": {"수량": 4, "비고": "강남 상주"}
                }
            }
        }
    })
}

fn locations_fixture() -> Value {
    json!({
        "구름스퀘어_강남": {
            "이름": "구름스퀘어 강남",
            "설명": "VX팀의 주요 중계 장소입니다.",
            "상세가이드링크": "https://example.com/gangnam",
            "카메라세팅": {
                "설명": "PTZ 카메라를 사용합니다.",
                "연결방법": ["전원을 연결한다", "리모컨과 페어링한다"]
            }
        },
        "구름스퀘어_판교": {
            "이름": "구름스퀘어 판교",
            "설명": "판교 교육장입니다."
        }
    })
}

#[test]
fn equipment_chunks_cover_items_with_quantity() {
    let documents = documents_from(&[("equipment_list", equipment_fixture())]);

    let chunks = build_chunks(&documents);

    let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert!(ids.contains(&"equipment_카메라_미러리스_A7S3"));
    assert!(ids.contains(&"equipment_카메라_미러리스_FX3"));
    assert!(ids.contains(&"equipment_오디오_무선마이크_UWP-D21"));
    assert_eq!(chunks.len(), 3);
}

#[test]
fn equipment_description_carries_details() {
    let documents = documents_from(&[("equipment_list", equipment_fixture())]);

    let chunks = build_chunks(&documents);
    let a7s3 = chunks
        .iter()
        .find(|c| c.id == "equipment_카메라_미러리스_A7S3")
        .expect("A7S3 chunk should exist");

    assert!(a7s3.content.contains("A7S3은(는) VX팀이 보유한 카메라의 미러리스 장비입니다."));
    assert!(a7s3.content.contains("현재 2대를 보유하고 있습니다."));
    assert!(a7s3.content.contains("모든 장비가 정상 상태입니다."));
    assert!(a7s3.content.contains("시리얼번호: SN-001, SN-002"));
    assert!(a7s3.content.contains("구성품: 배터리, 충전기"));
    assert!(a7s3.content.contains("주요 스펙: 4K 120fps"));
    assert_eq!(a7s3.metadata.category.as_deref(), Some("카메라"));
    assert_eq!(a7s3.metadata.sub_category.as_deref(), Some("미러리스"));
}

#[test]
fn location_chunks_have_main_and_features() {
    let documents = documents_from(&[("locations", locations_fixture())]);

    let chunks = build_chunks(&documents);

    let main = chunks
        .iter()
        .find(|c| c.id == "location_구름스퀘어_강남_main")
        .expect("main chunk should exist");
    assert!(main.content.contains("구름스퀘어 강남"));
    assert!(main.content.contains("주요 중계 장소"));
    assert!(main.content.contains("상세 가이드: https://example.com/gangnam"));
    assert_eq!(main.metadata.kind.as_deref(), Some("main"));

    let feature = chunks
        .iter()
        .find(|c| c.id == "location_구름스퀘어_강남_카메라세팅")
        .expect("feature chunk should exist");
    assert!(feature.content.contains("구름스퀘어 강남의 카메라 세팅: PTZ 카메라를 사용합니다."));
    assert!(feature.content.contains("1. 전원을 연결한다"));
    assert!(feature.content.contains("2. 리모컨과 페어링한다"));
    assert_eq!(feature.metadata.section.as_deref(), Some("카메라세팅"));
}

#[test]
fn deeply_nested_features_terminate() {
    // Nesting far beyond the depth bound must terminate and not descend
    // past MAX_DEPTH levels
    let mut leaf = json!({"설명": "가장 깊은 설명"});
    for level in (0..10).rev() {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(format!("단계{level}"), leaf);
        leaf = Value::Object(wrapper);
    }
    let document = json!({
        "테스트장소": {
            "이름": "테스트 장소",
            "기능": leaf,
        }
    });
    let documents = documents_from(&[("locations", document)]);

    let chunks = build_chunks(&documents);

    let feature = chunks.iter().find(|c| c.id == "location_테스트장소_기능");
    // The subtree bottoms out beyond the cap, so no feature text survives
    assert!(feature.is_none());
    assert!(chunks.iter().any(|c| c.id == "location_테스트장소_main"));
}

#[test]
fn checklist_and_faq_chunks() {
    let document = json!({
        "중계준비체크리스트": {
            "공통기본준비사항": ["장비 수량 확인", "배터리 충전"],
            "온라인중계시추가": ["회선 점검"]
        },
        "자주묻는질문FAQ": {
            "화면관련문제": {
                "검은화면": {
                    "문제": "OBS 화면이 검은색으로 나와요",
                    "원인": ["캡처보드 연결 불량"],
                    "해결방법": ["케이블을 다시 연결한다", "OBS를 재시작한다"],
                    "참고사항": "그래도 안 되면 장비를 교체하세요"
                }
            }
        }
    });
    let documents = documents_from(&[("checklists_and_faq", document)]);

    let chunks = build_chunks(&documents);

    let checklist = chunks
        .iter()
        .find(|c| c.id == "checklist_preparation")
        .expect("checklist chunk should exist");
    assert!(checklist.content.contains("중계 준비 체크리스트:"));
    assert!(checklist.content.contains("공통 기본 준비사항:\n1. 장비 수량 확인\n2. 배터리 충전"));
    assert!(checklist.content.contains("온라인 중계 시 추가사항:\n1. 회선 점검"));

    let faq = chunks
        .iter()
        .find(|c| c.id == "faq_화면관련문제_검은화면")
        .expect("faq chunk should exist");
    assert!(faq.content.contains("[화면 관련 문제] OBS 화면이 검은색으로 나와요"));
    assert!(faq.content.contains("해결방법 1: 케이블을 다시 연결한다"));
    assert!(faq.content.contains("해결방법 2: OBS를 재시작한다"));
    assert!(faq.content.contains("원인: 캡처보드 연결 불량"));
    assert!(faq.content.contains("참고사항:\n1. 그래도 안 되면 장비를 교체하세요"));
    assert_eq!(faq.metadata.kind.as_deref(), Some("faq"));
}

#[test]
fn guide_sections_and_subsections() {
    let document = json!({
        "장면구성": {
            "설명": "장면을 구성하는 방법",
            "생성방법": ["장면 추가 버튼을 누른다", "이름을 입력한다"],
            "소스설정": {
                "설명": "소스를 추가합니다",
                "주요소스유형": ["디스플레이 캡처", "비디오 캡처 장치"]
            }
        }
    });
    let documents = documents_from(&[("obs_guide", document)]);

    let chunks = build_chunks(&documents);

    let section = chunks
        .iter()
        .find(|c| c.id == "obs_장면구성")
        .expect("section chunk should exist");
    assert!(section.content.contains("장면구성: 장면을 구성하는 방법"));
    assert!(section.content.contains("생성 방법: 장면 추가 버튼을 누른다"));

    let subsection = chunks
        .iter()
        .find(|c| c.id == "obs_장면구성_소스설정")
        .expect("subsection chunk should exist");
    assert!(subsection.content.contains("소스를 추가합니다"));
    assert_eq!(subsection.metadata.kind.as_deref(), Some("subsection"));
}

#[test]
fn zoom_step_fields_render_numbered() {
    let document = json!({
        "화면공유": {
            "설명": "화면을 공유하는 기능",
            "방법": ["공유 버튼을 누른다", "화면을 선택한다"],
            "주의사항": ["오디오 공유 체크", "해상도 확인"]
        }
    });
    let documents = documents_from(&[("zoom_guide", document)]);

    let chunks = build_chunks(&documents);

    let section = chunks
        .iter()
        .find(|c| c.id == "zoom_화면공유")
        .expect("zoom section chunk should exist");
    assert!(section.content.contains("Zoom 화면공유: 화면을 공유하는 기능"));
    assert!(section.content.contains("방법:\n1. 공유 버튼을 누른다\n2. 화면을 선택한다"));
    assert!(section.content.contains("주의사항: 오디오 공유 체크, 해상도 확인"));
}

#[test]
fn platform_chunks() {
    let document = json!({
        "유튜브": {
            "설명": "라이브 스트리밍 플랫폼",
            "스트림키발급": ["스튜디오에 접속한다", "스트림 키를 복사한다"]
        }
    });
    let documents = documents_from(&[("platforms", document)]);

    let chunks = build_chunks(&documents);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].id, "platform_유튜브");
    assert!(chunks[0].content.contains("유튜브 플랫폼: 라이브 스트리밍 플랫폼"));
    assert!(chunks[0].content.contains("스트림키발급:\n1. 스튜디오에 접속한다"));
}

#[test]
fn build_is_deterministic() {
    let documents = documents_from(&[
        ("equipment_list", equipment_fixture()),
        ("locations", locations_fixture()),
    ]);

    let first = build_chunks(&documents);
    let second = build_chunks(&documents);

    assert_eq!(first, second);
}

#[test]
fn no_empty_chunks() {
    let documents = documents_from(&[
        ("equipment_list", equipment_fixture()),
        ("locations", locations_fixture()),
        ("platforms", json!({"빈플랫폼": {}, "유튜브": {"설명": "스트리밍"}})),
    ]);

    let chunks = build_chunks(&documents);

    assert!(chunks.iter().all(|c| !c.content.is_empty()));
    // The empty platform object produces no chunk at all
    assert!(!chunks.iter().any(|c| c.id == "platform_빈플랫폼"));
}

#[test]
fn keyword_cap_and_uniqueness() {
    let documents = documents_from(&[
        ("equipment_list", equipment_fixture()),
        ("locations", locations_fixture()),
    ]);

    for chunk in build_chunks(&documents) {
        assert!(chunk.metadata.keywords.len() <= MAX_KEYWORDS);
        let unique: std::collections::HashSet<&String> = chunk.metadata.keywords.iter().collect();
        assert_eq!(unique.len(), chunk.metadata.keywords.len());
    }
}

#[test]
fn malformed_document_is_skipped_not_fatal() {
    let documents = documents_from(&[
        ("equipment_list", json!("not an object")),
        ("locations", locations_fixture()),
    ]);

    let chunks = build_chunks(&documents);

    assert!(!chunks.iter().any(|c| c.metadata.source == "equipment_list"));
    assert!(chunks.iter().any(|c| c.metadata.source == "locations"));
}

#[test]
fn malformed_subtree_is_structural_error() {
    let err = process_document("equipment_list", &json!({"VX팀장비관리": "잘못된 값"}))
        .expect_err("non-object inventory should fail");

    assert_eq!(err.document, "equipment_list");
    assert_eq!(err.path, "VX팀장비관리");
}

#[test]
fn extract_keywords_filters_and_caps() {
    let keywords = extract_keywords("강남 구름스퀘어는 VX팀의 주요 중계 장소입니다.");

    assert!(keywords.contains(&"강남".to_string()));
    assert!(keywords.iter().all(|k| k.chars().count() > 1));
    assert!(keywords.len() <= MAX_KEYWORDS);

    // Particles and one-character tokens are dropped
    let keywords = extract_keywords("이 가 를 에 로 OBS OBS zoom");
    assert_eq!(keywords, vec!["obs".to_string(), "zoom".to_string()]);

    // More than ten distinct tokens are truncated in first-seen order
    let keywords =
        extract_keywords("하나 둘 셋 넷 다섯 여섯 일곱 여덟 아홉 열 열하나 열둘");
    assert_eq!(keywords.len(), MAX_KEYWORDS);
    assert_eq!(keywords[0], "하나");
    assert_eq!(keywords[9], "열");
}
