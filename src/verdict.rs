//! Verdict: pure mapping from (truth, confidence) to a category.

use serde::{Deserialize, Serialize};

pub const HIGH_CONFIDENCE: f64 = 0.80;
pub const MIN_CONFIDENCE: f64 = 0.50;
pub const STRONG_TRUTH: f64 = 0.80;
pub const LIKELY_TRUTH: f64 = 0.70;
pub const FALSE_TRUTH: f64 = 0.30;

// Scores are sums of products; keep e.g. 0.7999999999999999 on the 0.80 side.
const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    MostLikelyTrue,
    LikelyTrueNeedsSupport,
    InconclusiveMixed,
    LikelyFalse,
    InsufficientData,
}

impl Verdict {
    /// Both inputs on the `[0,1]` scale.
    ///
    /// | confidence | truth     | verdict                    |
    /// |------------|-----------|----------------------------|
    /// | ≥ 0.8      | ≥ 0.8     | MOST_LIKELY_TRUE           |
    /// | ≥ 0.5      | ≥ 0.7     | LIKELY_TRUE_NEEDS_SUPPORT  |
    /// | ≥ 0.5      | ≤ 0.3     | LIKELY_FALSE               |
    /// | ≥ 0.5      | otherwise | INCONCLUSIVE_MIXED         |
    /// | < 0.5      | any       | INSUFFICIENT_DATA          |
    pub fn classify(truth: f64, confidence: f64) -> Self {
        let at_least = |x: f64, t: f64| x + EPS >= t;
        if !at_least(confidence, MIN_CONFIDENCE) {
            return Verdict::InsufficientData;
        }
        if at_least(confidence, HIGH_CONFIDENCE) && at_least(truth, STRONG_TRUTH) {
            Verdict::MostLikelyTrue
        } else if at_least(truth, LIKELY_TRUTH) {
            Verdict::LikelyTrueNeedsSupport
        } else if truth <= FALSE_TRUTH + EPS {
            Verdict::LikelyFalse
        } else {
            Verdict::InconclusiveMixed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::MostLikelyTrue => "MOST_LIKELY_TRUE",
            Verdict::LikelyTrueNeedsSupport => "LIKELY_TRUE_NEEDS_SUPPORT",
            Verdict::InconclusiveMixed => "INCONCLUSIVE_MIXED",
            Verdict::LikelyFalse => "LIKELY_FALSE",
            Verdict::InsufficientData => "INSUFFICIENT_DATA",
        }
    }

    /// Short human-readable label.
    pub fn description(self) -> &'static str {
        match self {
            Verdict::MostLikelyTrue => "Most likely true",
            Verdict::LikelyTrueNeedsSupport => "Likely true, needs more support",
            Verdict::InconclusiveMixed => "Inconclusive, evidence is mixed",
            Verdict::LikelyFalse => "Likely false",
            Verdict::InsufficientData => "Insufficient data",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
