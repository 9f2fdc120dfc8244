use super::*;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    config.validate().expect("default config should validate");
    assert_eq!(config.embedding.embedding_dimension, EMBEDDING_DIMENSION);
    assert_eq!(config.search.min_top_k, 3);
    assert_eq!(config.search.max_top_k, 4);
}

#[test]
fn load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");

    let config = Config::load_from(temp_dir.path()).expect("load should fall back to defaults");

    assert_eq!(config, Config::default());
}

#[test]
fn config_file_round_trip() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_path = temp_dir.path().join("config.toml");

    let original = Config {
        embedding: EmbeddingConfig {
            host: "embed-host".to_string(),
            port: 8080,
            ..EmbeddingConfig::default()
        },
        search: SearchConfig {
            keyword_weight: 0.4,
            ..SearchConfig::default()
        },
        data_dir: PathBuf::from("/srv/vx/data"),
        ..Config::default()
    };

    let toml_content = toml::to_string_pretty(&original)
        .expect("config should convert to toml string successfully");
    fs::write(&config_path, toml_content).expect("should write to config_path successfully");

    let loaded = Config::load_from(temp_dir.path()).expect("should load config from dir");

    assert_eq!(original, loaded);
}

#[test]
fn partial_config_fills_defaults() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_path = temp_dir.path().join("config.toml");

    fs::write(
        &config_path,
        "[embedding]\nhost = \"remote\"\n\n[search]\nkeyword_weight = 0.55\n",
    )
    .expect("should write to config_path successfully");

    let loaded = Config::load_from(temp_dir.path()).expect("should load partial config");

    assert_eq!(loaded.embedding.host, "remote");
    assert_eq!(loaded.embedding.port, EmbeddingConfig::default().port);
    assert!((loaded.search.keyword_weight - 0.55).abs() < f32::EPSILON);
    assert_eq!(loaded.answer, AnswerConfig::default());
}

#[test]
fn invalid_toml_is_rejected() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, "this is not [valid toml").expect("should write invalid content");

    assert!(Config::load_from(temp_dir.path()).is_err());
}

#[test]
fn embedding_validation_rejects_bad_values() {
    let config = EmbeddingConfig {
        protocol: "ftp".to_string(),
        ..EmbeddingConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));

    let config = EmbeddingConfig {
        port: 0,
        ..EmbeddingConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidPort(0))));

    let config = EmbeddingConfig {
        model: "  ".to_string(),
        ..EmbeddingConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidModel(_))
    ));

    let config = EmbeddingConfig {
        embedding_dimension: 16,
        ..EmbeddingConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidEmbeddingDimension(16))
    ));
}

#[test]
fn search_validation_rejects_bad_ranges() {
    let config = SearchConfig {
        min_top_k: 5,
        max_top_k: 3,
        ..SearchConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTopKRange(5, 3))
    ));

    let config = SearchConfig {
        keyword_weight: 1.5,
        ..SearchConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWeight(_))
    ));

    let config = SearchConfig {
        fair_score: 0.9,
        ..SearchConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidQualityThresholds)
    ));
}

#[test]
fn answer_validation_rejects_bad_values() {
    let config = AnswerConfig {
        min_overlap_ratio: 1.2,
        ..AnswerConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidOverlapRatio(_))
    ));

    let config = AnswerConfig {
        snippet_chars: 10,
        ..AnswerConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSnippetChars(10))
    ));

    let config = AnswerConfig {
        max_answer_lines: 0,
        ..AnswerConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidAnswerLines(0))
    ));
}
