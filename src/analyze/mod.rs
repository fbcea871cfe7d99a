// src/analyze/mod.rs
//! Stance analysis: how an evidence text relates to a claim.
//!
//! Backends sit behind [`StanceClassifier`] and are picked when the engine is
//! built; scoring only ever sees a [`StanceJudgement`].

pub mod lexical;
pub mod stance;

use serde::Serialize;
use std::sync::Arc;

use crate::evidence::Stance;

pub use crate::analyze::stance::{
    cosine_similarity, EntailmentModel, HeuristicClassifier, ModelBackedClassifier, NliScores,
};

/// Signed stance above which a candidate supports the claim.
pub const SUPPORT_THRESHOLD: f64 = 0.3;
/// Signed stance below which a candidate contradicts the claim.
pub const CONTRADICT_THRESHOLD: f64 = -0.3;
/// Similarity at which a near-neutral candidate is read as agreeing.
pub const NEAR_DUPLICATE_SIMILARITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StanceJudgement {
    /// Relatedness in `[0,1]`.
    pub similarity: f64,
    /// Signed stance in `[-1,1]`.
    pub score: f64,
    pub stance: Stance,
}

impl StanceJudgement {
    pub fn empty() -> Self {
        Self {
            similarity: 0.0,
            score: 0.0,
            stance: Stance::Neutral,
        }
    }

    /// Clamp both inputs and apply the stance thresholds.
    pub fn from_scores(similarity: f64, score: f64) -> Self {
        let similarity = if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let score = if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            similarity,
            score,
            stance: classify_score(score, similarity),
        }
    }
}

/// Thresholds: `> 0.3` supporting, `< -0.3` contradicting; in between,
/// similarity `>= 0.7` still counts as supporting.
pub fn classify_score(score: f64, similarity: f64) -> Stance {
    if score > SUPPORT_THRESHOLD {
        Stance::Supporting
    } else if score < CONTRADICT_THRESHOLD {
        Stance::Contradicting
    } else if similarity >= NEAR_DUPLICATE_SIMILARITY {
        Stance::Supporting
    } else {
        Stance::Neutral
    }
}

/// Stance backend. Implementations must not fail: degrade internally instead.
pub trait StanceClassifier: Send + Sync {
    fn classify(&self, claim: &str, text: &str) -> StanceJudgement;
    /// Backend name for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynStanceClassifier = Arc<dyn StanceClassifier>;
