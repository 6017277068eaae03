use faqdb_core::config::{Config, SearchConfig};
use faqdb_core::types::{
    ConfidenceBand, SearchOptions, SourceKind, SourceRecord, HIGH_CONFIDENCE, MEDIUM_CONFIDENCE,
};

#[test]
fn search_config_defaults() {
    let cfg = SearchConfig::default();
    assert_eq!(cfg.limit, 10);
    assert!((cfg.min_similarity - 0.45).abs() < 1e-6);
    assert_eq!(cfg.embedding_dimension, 768);
    assert_eq!(cfg.cache_size, 500);
    assert_eq!(cfg.cache_ttl().as_secs(), 30 * 60);
    assert_eq!(cfg.per_source_timeout().as_millis(), 5_000);
    assert_eq!(cfg.embedding_timeout().as_millis(), 10_000);
}

#[test]
fn config_toml_overrides_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [search]
                limit = 5
                min_similarity = 0.6

                [ratelimit.openai]
                capacity = 20
                refill_per_minute = 10
            "#,
        )?;
        let config = Config::load().expect("config loads");
        let search = config.search();
        assert_eq!(search.limit, 5);
        assert!((search.min_similarity - 0.6).abs() < 1e-6);
        // unspecified keys keep the built-in defaults
        assert_eq!(search.cache_size, 500);

        let limits = config.rate_limits();
        let openai = limits.get("openai").expect("openai bucket configured");
        assert_eq!(openai.capacity, 20);
        assert_eq!(openai.refill_per_minute, 10);
        Ok(())
    });
}

#[test]
fn validate_rejects_inert_values() {
    assert!(SearchConfig::default().validate().is_ok());
    let zero_dim = SearchConfig { embedding_dimension: 0, ..SearchConfig::default() };
    assert!(zero_dim.validate().is_err());
    let zero_limit = SearchConfig { limit: 0, ..SearchConfig::default() };
    assert!(zero_limit.validate().is_err());
    let bad_floor = SearchConfig { min_similarity: 1.5, ..SearchConfig::default() };
    assert!(bad_floor.validate().is_err());
}

#[test]
fn confidence_bands_use_named_thresholds() {
    assert_eq!(ConfidenceBand::for_similarity(HIGH_CONFIDENCE), ConfidenceBand::High);
    assert_eq!(ConfidenceBand::for_similarity(0.80), ConfidenceBand::High);
    assert_eq!(ConfidenceBand::for_similarity(0.50), ConfidenceBand::Medium);
    assert_eq!(ConfidenceBand::for_similarity(MEDIUM_CONFIDENCE), ConfidenceBand::Medium);
    assert_eq!(ConfidenceBand::for_similarity(0.30), ConfidenceBand::None);
}

#[test]
fn faq_only_options_disable_other_sources() {
    let opts = SearchOptions::faq_only(1, 0.45);
    assert!(opts.include_faqs);
    assert!(!opts.include_chunks);
    assert!(!opts.include_documents);
    assert!(!opts.include_images);
    assert!(!opts.include_graphs);
    assert_eq!(opts.limit, 1);
}

#[test]
fn source_record_tagged_json_round_trip() {
    let json = r#"{
        "type": "faq",
        "id": "faq:1",
        "question": "How do I reset my password?",
        "answer": "Use the reset link on the login page.",
        "keywords": ["password", "reset"]
    }"#;
    let record: SourceRecord = serde_json::from_str(json).expect("faq parses");
    assert_eq!(record.id(), "faq:1");
    assert_eq!(record.source_kind(), SourceKind::Faq);
    match &record {
        SourceRecord::Faq(f) => {
            assert!(f.active, "active defaults to true");
            assert!(f.question_embedding.is_none());
        }
        other => panic!("expected faq, got {other:?}"),
    }
}
