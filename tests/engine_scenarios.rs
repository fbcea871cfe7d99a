// tests/engine_scenarios.rs
//
// End-to-end scoring scenarios through `VerificationEngine::verify`.
//
// Covered:
// - strong, fresh, unanimous support → MOST_LIKELY_TRUE
// - single unknown source without timestamp → INSUFFICIENT_DATA
// - balanced support/contradiction → INCONCLUSIVE_MIXED
// - contradicting majority → LIKELY_FALSE
// - empty evidence list
// - idempotence (bit-identical output)
// - near-duplicate titles are dropped before scoring

use chrono::{DateTime, Duration, TimeZone, Utc};
use veracity_engine::{Evidence, Stance, Verdict, VerificationEngine};

const CLAIM: &str = "Central bank raises interest rates by half a point";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 15, 0, 0).unwrap()
}

fn minutes_ago(m: i64) -> String {
    (now() - Duration::minutes(m)).to_rfc3339()
}

fn tagged(domain: &str, title: &str, stance: Stance, published: &str) -> Evidence {
    Evidence::new(format!("https://www.{domain}/story"), "", title, "Full report.")
        .published(published)
        .with_similarity(0.9)
        .with_stance(stance)
}

#[test]
fn strong_fresh_support_is_most_likely_true() {
    let engine = VerificationEngine::with_defaults();
    let evidence = vec![
        tagged("reuters.com", "Rates go up half a point", Stance::Supporting, &minutes_ago(5)),
        tagged(
            "apnews.com",
            "Policy makers lift borrowing costs",
            Stance::Supporting,
            &minutes_ago(10),
        ),
        tagged("bbc.com", "Monetary tightening continues", Stance::Supporting, &minutes_ago(20)),
        tagged(
            "bloomberg.com",
            "Bank hikes as inflation lingers",
            Stance::Supporting,
            &minutes_ago(30),
        ),
        tagged("ap.org", "Decision announced this afternoon", Stance::Supporting, &minutes_ago(45)),
    ];

    let b = engine.verify(CLAIM, &evidence, now());
    assert!(b.truth_score >= 0.9, "truth {}", b.truth_score);
    assert!(b.confidence_score >= 0.8 - 1e-9, "confidence {}", b.confidence_score);
    assert_eq!(b.verdict, Verdict::MostLikelyTrue);
    assert!(b.truth_percent() >= 90.0);
    assert_eq!(b.breakdown.unique_sources, 5);
    assert_eq!(b.breakdown.claim_category, "business");
    assert_eq!(b.breakdown.claim_region, "global");
}

#[test]
fn single_unknown_source_is_insufficient() {
    let engine = VerificationEngine::with_defaults();
    let ev = Evidence::new(
        "https://someblog.example/post",
        "Some Blog",
        "Rates up again",
        "The bank raised rates.",
    )
    .with_similarity(0.8)
    .with_stance(Stance::Supporting);

    let b = engine.verify(CLAIM, &[ev], now());
    assert!((b.breakdown.quantity - 0.1).abs() < 1e-12);
    assert!((b.breakdown.diversity - 0.2).abs() < 1e-12);
    assert!((b.breakdown.recency - 0.5).abs() < 1e-12);
    assert!(b.confidence_score < 0.5);
    assert_eq!(b.verdict, Verdict::InsufficientData);
}

#[test]
fn balanced_evidence_is_inconclusive() {
    let engine = VerificationEngine::with_defaults();
    let t = minutes_ago(15);
    let evidence = vec![
        tagged("reuters.com", "Rates go up half a point", Stance::Supporting, &t),
        tagged("apnews.com", "Policy makers lift borrowing costs", Stance::Supporting, &t),
        tagged("bbc.com", "Monetary tightening continues", Stance::Supporting, &t),
        tagged("reuters.com", "Officials deny any change to policy", Stance::Contradicting, &t),
        tagged("apnews.com", "No hike at this meeting, sources say", Stance::Contradicting, &t),
        tagged("bbc.com", "Bank holds steady despite pressure", Stance::Contradicting, &t),
    ];

    let b = engine.verify(CLAIM, &evidence, now());
    assert!((b.truth_score - 0.5).abs() < 1e-9, "truth {}", b.truth_score);
    assert!(b.confidence_score >= 0.5);
    assert_eq!(b.verdict, Verdict::InconclusiveMixed);
}

#[test]
fn contradicting_majority_is_likely_false() {
    let engine = VerificationEngine::with_defaults();
    let t = minutes_ago(15);
    let evidence = vec![
        tagged("reuters.com", "Officials deny any change to policy", Stance::Contradicting, &t),
        tagged("apnews.com", "No hike at this meeting, sources say", Stance::Contradicting, &t),
        tagged("bbc.com", "Bank holds steady despite pressure", Stance::Contradicting, &t),
        tagged("bloomberg.com", "Report of a hike was wrong", Stance::Contradicting, &t),
        tagged("cnn.com", "Rates rise, one blog claims", Stance::Supporting, &t),
    ];

    let b = engine.verify(CLAIM, &evidence, now());
    assert!(b.truth_score <= 0.3, "truth {}", b.truth_score);
    assert_eq!(b.verdict, Verdict::LikelyFalse);
}

#[test]
fn empty_evidence_list() {
    let b = VerificationEngine::with_defaults().verify(CLAIM, &[], now());
    assert_eq!(b.truth_score, 0.0);
    assert!(b.confidence_score > 0.0);
    assert_eq!(b.verdict, Verdict::InsufficientData);
    assert_eq!(b.breakdown.total_weight, 0.0);
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let engine = VerificationEngine::with_defaults();
    let evidence = vec![
        Evidence::new(
            "https://www.scmp.com/a",
            "SCMP",
            "Hong Kong rates follow",
            "Banks in Hong Kong move.",
        ),
        Evidence::new("", "Reuters", "Rates rise", "The central bank raised interest rates.")
            .published("3 hours ago"),
        Evidence::new("https://unknown.example", "", "Unrelated", "Cats and dogs."),
    ];
    let a = engine.verify(CLAIM, &evidence, now());
    let b = engine.verify(CLAIM, &evidence, now());
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn near_duplicate_titles_count_once() {
    let engine = VerificationEngine::with_defaults();
    let t = minutes_ago(5);
    let evidence = vec![
        tagged("reuters.com", "Central bank raises rates by 0.5%", Stance::Supporting, &t),
        tagged("cnn.com", "Central Bank raises rates by 0.5 %", Stance::Contradicting, &t),
    ];
    let b = engine.verify(CLAIM, &evidence, now());
    assert_eq!(b.items.len(), 1);
    assert_eq!(b.dropped_duplicates.len(), 1);
    assert_eq!(b.items[0].domain, "reuters.com");
    assert!((b.truth_score - 1.0).abs() < 1e-12);
}

#[test]
fn source_name_resolves_through_aliases() {
    let engine = VerificationEngine::with_defaults();
    let ev = Evidence::new("", "The Wall Street Journal", "Rates rise", "")
        .with_similarity(0.9)
        .with_stance(Stance::Supporting);
    let b = engine.verify(CLAIM, &[ev], now());
    assert_eq!(b.items[0].domain, "wsj.com");
    // Business expert, national reach: well above the unknown-source weight.
    let unknown = engine.registry().weight_of("nowhere.example", "business", "global");
    assert!(b.items[0].source_weight > unknown);
}
