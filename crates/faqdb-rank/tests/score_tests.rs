use faqdb_core::types::{
    ChunkEntry, ChunkKind, FaqEntry, Importance, MatchField, MediaKind,
};
use faqdb_core::Error;
use faqdb_rank::{
    cosine_similarity, weighted_chunk_score, weighted_document_score, weighted_faq_score,
    weighted_media_score,
};

fn faq(keywords: &[&str], from_analysis: bool, confidence: Option<f32>) -> FaqEntry {
    FaqEntry {
        id: "faq:1".into(),
        question: "환불 방법".into(),
        answer: "주문 내역에서 환불을 신청하세요.".into(),
        category: String::new(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        from_semantic_analysis: from_analysis,
        confidence,
        question_embedding: None,
        answer_embedding: None,
        active: true,
    }
}

fn chunk(importance: Importance, kind: ChunkKind, keywords: &[&str]) -> ChunkEntry {
    ChunkEntry {
        id: "chunk:1".into(),
        document_id: "doc:1".into(),
        content: "refund policy details".into(),
        page: Some(3),
        chunk_index: 0,
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        importance,
        kind,
        confidence: None,
        embedding: None,
        active: true,
    }
}

#[test]
fn cosine_of_vector_with_itself_is_one() {
    let v = vec![0.3, -0.7, 0.2, 0.9];
    let sim = cosine_similarity(&v, &v).expect("same length");
    assert!((sim - 1.0).abs() < 1e-6, "sim={sim}");
}

#[test]
fn cosine_of_opposite_vectors_is_minus_one() {
    let v = vec![0.3, -0.7, 0.2, 0.9];
    let neg: Vec<f32> = v.iter().map(|x| -x).collect();
    let sim = cosine_similarity(&v, &neg).expect("same length");
    assert!((sim + 1.0).abs() < 1e-6, "sim={sim}");
}

#[test]
fn cosine_of_orthogonal_vectors_is_zero() {
    let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).expect("same length");
    assert!(sim.abs() < 1e-6);
}

#[test]
fn cosine_with_zero_magnitude_is_zero() {
    let sim = cosine_similarity(&[0.0, 0.0], &[0.5, 0.5]).expect("same length");
    assert_eq!(sim, 0.0);
}

#[test]
fn cosine_dimension_mismatch_is_an_error() {
    match cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]) {
        Err(Error::DimensionMismatch { left: 2, right: 3 }) => {}
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn faq_question_match_boosts_by_1_2() {
    let entry = faq(&[], false, None);
    let score = weighted_faq_score(0.90, MatchField::Question, &entry, "환불 어떻게 하나요");
    assert!((score - 1.08).abs() < 1e-6, "score={score}");
}

#[test]
fn faq_answer_match_dampens_by_0_8() {
    let entry = faq(&[], false, None);
    let score = weighted_faq_score(0.90, MatchField::Answer, &entry, "환불 어떻게 하나요");
    assert!((score - 0.72).abs() < 1e-6, "score={score}");
}

#[test]
fn faq_keyword_overlap_composes_multiplicatively() {
    let entry = faq(&["환불"], false, None);
    let score = weighted_faq_score(0.90, MatchField::Question, &entry, "환불 어떻게 하나요");
    let expected = 0.90 * 1.2 * 1.15;
    assert!((score - expected).abs() < 1e-6, "score={score} expected={expected}");
}

#[test]
fn faq_provenance_boost_depends_on_field() {
    let entry = faq(&[], true, None);
    let question = weighted_faq_score(0.5, MatchField::Question, &entry, "배송");
    let answer = weighted_faq_score(0.5, MatchField::Answer, &entry, "배송");
    assert!((question - 0.5 * 1.2 * 1.1).abs() < 1e-6);
    assert!((answer - 0.5 * 0.8 * 1.05).abs() < 1e-6);
}

#[test]
fn faq_confidence_rescales_into_point_eight_to_one() {
    let entry = faq(&[], false, Some(0.5));
    let score = weighted_faq_score(1.0, MatchField::Question, &entry, "배송");
    assert!((score - 1.2 * 0.9).abs() < 1e-6, "score={score}");

    // Out-of-range confidence is ignored.
    let entry = faq(&[], false, Some(1.5));
    let score = weighted_faq_score(1.0, MatchField::Question, &entry, "배송");
    assert!((score - 1.2).abs() < 1e-6);
}

#[test]
fn chunk_boost_table_composes() {
    let c = chunk(Importance::High, ChunkKind::Page, &["refund"]);
    let score = weighted_chunk_score(0.5, &c, "refund steps");
    let expected = 0.5 * 1.2 * 1.2 * 1.15;
    assert!((score - expected).abs() < 1e-6, "score={score} expected={expected}");

    let c = chunk(Importance::Medium, ChunkKind::Heading, &[]);
    let score = weighted_chunk_score(0.5, &c, "unrelated");
    let expected = 0.5 * 1.05 * 1.1;
    assert!((score - expected).abs() < 1e-6);

    let c = chunk(Importance::Low, ChunkKind::Other, &[]);
    let score = weighted_chunk_score(0.5, &c, "unrelated");
    assert!((score - 0.5).abs() < 1e-6, "low/other chunk has no boost");
}

#[test]
fn document_and_media_boosts() {
    assert_eq!(weighted_document_score(0.7), 0.7);
    assert_eq!(weighted_media_score(0.7, MediaKind::Image), 0.7);
    let graph = weighted_media_score(0.7, MediaKind::Graph);
    assert!((graph - 0.77).abs() < 1e-6);
}
