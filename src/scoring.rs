//! Score aggregation.
//!
//! Per item: `combined = weight × recency × similarity`.
//! - truth      = Σ combined(agreeing) / Σ combined, 0 when the sum is 0
//! - confidence = 0.4·quantity + 0.3·diversity + 0.3·mean recency
//!
//! where quantity = min(n/10, 1) and diversity = min(unique domains/5, 1).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::evidence::Stance;
use crate::source_weights::clamp01;

pub const QUANTITY_SATURATION: f64 = 10.0;
pub const DIVERSITY_SATURATION: f64 = 5.0;
/// Untagged (or neutral) items agree when similarity exceeds this.
pub const AGREEMENT_SIMILARITY: f64 = 0.7;
/// Confidence reported when there is no evidence at all.
pub const EMPTY_EVIDENCE_CONFIDENCE: f64 = 0.10;

/// Weights of the confidence composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceWeights {
    pub quantity: f64,
    pub diversity: f64,
    pub recency: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            quantity: 0.4,
            diversity: 0.3,
            recency: 0.3,
        }
    }
}

/// One evidence item after weighting. All factors in `[0,1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEvidence {
    pub domain: String,
    pub title: String,
    /// Registry weight before the regional boost.
    pub source_weight: f64,
    pub regional_boost: f64,
    /// `min(1, source_weight × regional_boost)`.
    pub weight: f64,
    pub recency: f64,
    pub similarity: f64,
    pub stance: Option<Stance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance_score: Option<f64>,
    pub combined_weight: f64,
    pub agrees: bool,
}

impl ScoredEvidence {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        domain: impl Into<String>,
        title: impl Into<String>,
        source_weight: f64,
        regional_boost: f64,
        recency: f64,
        similarity: f64,
        stance: Option<Stance>,
        stance_score: Option<f64>,
    ) -> Self {
        let source_weight = clamp01(source_weight);
        let regional_boost = if regional_boost.is_finite() && regional_boost > 0.0 {
            regional_boost
        } else {
            1.0
        };
        let weight = clamp01(source_weight * regional_boost);
        let recency = clamp01(recency);
        let similarity = clamp01(similarity);
        Self {
            domain: domain.into(),
            title: title.into(),
            source_weight,
            regional_boost,
            weight,
            recency,
            similarity,
            stance,
            stance_score,
            combined_weight: weight * recency * similarity,
            agrees: agrees_with_claim(stance, similarity),
        }
    }
}

/// Explicit tag wins; otherwise high similarity is read as agreement.
pub fn agrees_with_claim(stance: Option<Stance>, similarity: f64) -> bool {
    match stance {
        Some(Stance::Supporting) => true,
        Some(Stance::Contradicting) => false,
        Some(Stance::Neutral) | None => similarity > AGREEMENT_SIMILARITY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TruthTally {
    pub supporting_weight: f64,
    pub total_weight: f64,
    pub truth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfidenceFactors {
    pub quantity: f64,
    pub diversity: f64,
    pub recency: f64,
    pub unique_sources: usize,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator {
    weights: ConfidenceWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ConfidenceWeights) -> Self {
        Self { weights }
    }

    pub fn truth_score(&self, items: &[ScoredEvidence]) -> TruthTally {
        let mut tally = TruthTally::default();
        for it in items {
            tally.total_weight += it.combined_weight;
            if it.agrees {
                tally.supporting_weight += it.combined_weight;
            }
        }
        tally.truth = if tally.total_weight > 0.0 {
            clamp01(tally.supporting_weight / tally.total_weight)
        } else {
            0.0
        };
        tally
    }

    pub fn confidence_score(&self, items: &[ScoredEvidence]) -> ConfidenceFactors {
        if items.is_empty() {
            return ConfidenceFactors {
                confidence: EMPTY_EVIDENCE_CONFIDENCE,
                ..Default::default()
            };
        }
        let n = items.len() as f64;
        let unique: BTreeSet<&str> = items
            .iter()
            .map(|i| i.domain.as_str())
            .filter(|d| !d.is_empty())
            .collect();
        let quantity = (n / QUANTITY_SATURATION).min(1.0);
        let diversity = (unique.len() as f64 / DIVERSITY_SATURATION).min(1.0);
        let recency = items.iter().map(|i| i.recency).sum::<f64>() / n;

        let w = &self.weights;
        ConfidenceFactors {
            quantity,
            diversity,
            recency,
            unique_sources: unique.len(),
            confidence: clamp01(
                w.quantity * quantity + w.diversity * diversity + w.recency * recency,
            ),
        }
    }
}
