//! Result record of one verification.

use serde::{Deserialize, Serialize};

use crate::scoring::{ConfidenceFactors, ScoredEvidence, TruthTally};
use crate::verdict::Verdict;

/// Per-factor contributions behind the two scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factors {
    pub quantity: f64,
    pub diversity: f64,
    pub recency: f64,
    pub supporting_weight: f64,
    pub total_weight: f64,
    pub claim_category: String,
    pub claim_region: String,
    pub evidence_count: usize,
    pub unique_sources: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// `[0,1]`
    pub truth_score: f64,
    /// `[0,1]`
    pub confidence_score: f64,
    pub verdict: Verdict,
    pub breakdown: Factors,
    pub items: Vec<ScoredEvidence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_duplicates: Vec<String>,
    /// Stance backend that judged untagged items.
    pub classifier: String,
}

impl ScoreBreakdown {
    pub(crate) fn assemble(
        truth: TruthTally,
        confidence: ConfidenceFactors,
        claim_category: String,
        claim_region: String,
        items: Vec<ScoredEvidence>,
        dropped_duplicates: Vec<String>,
        classifier: &str,
    ) -> Self {
        Self {
            truth_score: truth.truth,
            confidence_score: confidence.confidence,
            verdict: Verdict::classify(truth.truth, confidence.confidence),
            breakdown: Factors {
                quantity: confidence.quantity,
                diversity: confidence.diversity,
                recency: confidence.recency,
                supporting_weight: truth.supporting_weight,
                total_weight: truth.total_weight,
                claim_category,
                claim_region,
                evidence_count: items.len(),
                unique_sources: confidence.unique_sources,
            },
            items,
            dropped_duplicates,
            classifier: classifier.to_string(),
        }
    }

    pub fn truth_percent(&self) -> f64 {
        to_percent(self.truth_score)
    }

    pub fn confidence_percent(&self) -> f64 {
        to_percent(self.confidence_score)
    }
}

/// `[0,1]` → `[0,100]`, one decimal.
pub fn to_percent(x: f64) -> f64 {
    (x * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_conversion() {
        assert_eq!(to_percent(0.0), 0.0);
        assert_eq!(to_percent(0.8), 80.0);
        assert_eq!(to_percent(0.12345), 12.3);
        assert_eq!(to_percent(1.0), 100.0);
    }

    #[test]
    fn assemble_copies_factors() {
        let b = ScoreBreakdown::assemble(
            TruthTally {
                supporting_weight: 0.0,
                total_weight: 0.0,
                truth: 0.0,
            },
            ConfidenceFactors {
                confidence: 0.1,
                ..Default::default()
            },
            "general".into(),
            "global".into(),
            Vec::new(),
            Vec::new(),
            "heuristic",
        );
        assert_eq!(b.verdict, Verdict::InsufficientData);
        assert_eq!(b.breakdown.claim_region, "global");
        assert_eq!(b.confidence_percent(), 10.0);

        let v = serde_json::to_value(&b).unwrap();
        assert!(v.get("truthScore").is_some());
        assert!(v["breakdown"].get("supportingWeight").is_some());
        assert!(v.get("droppedDuplicates").is_none());
    }
}
