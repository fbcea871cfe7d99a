// tests/stance_model.rs
//
// Engine wired with a model-backed stance classifier.
//
// Covered:
// - model verdicts drive untagged items
// - a failing model degrades to the heuristic with identical results
// - pre-tagged items never reach the model

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use veracity_engine::{
    EntailmentModel, Evidence, HeuristicClassifier, ModelBackedClassifier, NliScores,
    RegionalMatcher, SourceWeightRegistry, Stance, Verdict, VerificationEngine,
};

/// Says "contradiction" whenever the text mentions "hoax", else "entailment".
#[derive(Default)]
struct KeywordNli {
    calls: AtomicUsize,
}

impl EntailmentModel for KeywordNli {
    fn name(&self) -> &'static str {
        "keyword-nli"
    }

    fn entail(&self, _claim: &str, text: &str) -> Result<NliScores> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if text.to_lowercase().contains("hoax") {
            NliScores {
                entailment: 0.05,
                contradiction: 0.9,
                neutral: 0.05,
            }
        } else {
            NliScores {
                entailment: 0.85,
                contradiction: 0.05,
                neutral: 0.1,
            }
        })
    }

    fn embed(&self, _text: &str) -> Result<Option<Vec<f32>>> {
        Ok(Some(vec![0.5, 0.5, 0.5]))
    }
}

struct Offline;

impl EntailmentModel for Offline {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn entail(&self, _claim: &str, _text: &str) -> Result<NliScores> {
        bail!("connection refused")
    }
}

fn engine_with<M: EntailmentModel + 'static>(model: M) -> VerificationEngine {
    VerificationEngine::new(
        SourceWeightRegistry::with_defaults(),
        RegionalMatcher::with_defaults(),
        Arc::new(ModelBackedClassifier::new(model)),
    )
}

fn evidence() -> Vec<Evidence> {
    vec![
        Evidence::new(
            "https://reuters.com/a",
            "",
            "Moon landing anniversary",
            "Crowds celebrate the mission.",
        )
        .published("1 hour ago"),
        Evidence::new(
            "https://bbc.com/b",
            "",
            "Viral post calls it a hoax",
            "Experts reject the claim.",
        )
        .published("2 hours ago"),
    ]
}

#[test]
fn model_judges_untagged_items() {
    let now = Utc.with_ymd_and_hms(2025, 7, 20, 20, 0, 0).unwrap();
    let engine = engine_with(KeywordNli::default());
    let b = engine.verify("Humans landed on the Moon in 1969", &evidence(), now);

    assert_eq!(b.classifier, "keyword-nli");
    assert_eq!(b.items[0].stance, Some(Stance::Supporting));
    assert_eq!(b.items[1].stance, Some(Stance::Contradicting));
    // Identical embeddings → cosine similarity 1.
    assert!(b.items.iter().all(|i| (i.similarity - 1.0).abs() < 1e-6));
    assert!(b.truth_score > 0.0 && b.truth_score < 1.0);
}

#[test]
fn offline_model_degrades_to_heuristic() {
    let now = Utc.with_ymd_and_hms(2025, 7, 20, 20, 0, 0).unwrap();
    let claim = "Humans landed on the Moon in 1969";

    let degraded = engine_with(Offline).verify(claim, &evidence(), now);
    let heuristic = VerificationEngine::new(
        SourceWeightRegistry::with_defaults(),
        RegionalMatcher::with_defaults(),
        Arc::new(HeuristicClassifier::new()),
    )
    .verify(claim, &evidence(), now);

    assert_eq!(degraded.items, heuristic.items);
    assert_eq!(degraded.truth_score, heuristic.truth_score);
    assert_eq!(degraded.verdict, heuristic.verdict);
    assert_eq!(degraded.classifier, "offline");
}

#[test]
fn pretagged_items_skip_the_model() {
    let now = Utc.with_ymd_and_hms(2025, 7, 20, 20, 0, 0).unwrap();
    let model = Arc::new(ModelBackedClassifier::new(KeywordNli::default()));
    let engine = VerificationEngine::new(
        SourceWeightRegistry::with_defaults(),
        RegionalMatcher::with_defaults(),
        model.clone(),
    );
    let tagged: Vec<Evidence> = evidence()
        .into_iter()
        .map(|e| e.with_similarity(0.9).with_stance(Stance::Supporting))
        .collect();

    let b = engine.verify("Humans landed on the Moon in 1969", &tagged, now);
    assert_eq!(model.model().calls.load(Ordering::SeqCst), 0);
    assert!((b.truth_score - 1.0).abs() < 1e-12);
    assert_ne!(b.verdict, Verdict::LikelyFalse);
}
