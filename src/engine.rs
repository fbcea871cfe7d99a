//! # Verification Engine
//! Pure, synchronous scoring of one claim against a list of evidence items.
//! No I/O and no clock reads: the reference instant is an argument, so the
//! same inputs always give the same [`ScoreBreakdown`].
//!
//! Pipeline: clean → de-duplicate titles → stance/similarity (pre-tagged
//! values win) → source weight × regional boost → recency → aggregate →
//! verdict.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::analyze::lexical::lexical_similarity;
use crate::analyze::{DynStanceClassifier, HeuristicClassifier};
use crate::breakdown::ScoreBreakdown;
use crate::claim::{Claim, ClaimProfiler};
use crate::config::{EngineSettings, TablePaths};
use crate::evidence::{dedup_by_title, truncate_chars, Evidence};
use crate::recency::RecencyModel;
use crate::regions::RegionalMatcher;
use crate::scoring::{ConfidenceWeights, ScoreAggregator, ScoredEvidence};
use crate::source_weights::SourceWeightRegistry;

/// Built once at start-up and shared read-only (typically in an `Arc`).
pub struct VerificationEngine {
    registry: SourceWeightRegistry,
    regions: RegionalMatcher,
    profiler: ClaimProfiler,
    classifier: DynStanceClassifier,
    aggregator: ScoreAggregator,
    settings: EngineSettings,
}

impl VerificationEngine {
    pub fn new(
        registry: SourceWeightRegistry,
        regions: RegionalMatcher,
        classifier: DynStanceClassifier,
    ) -> Self {
        Self {
            registry,
            regions,
            profiler: ClaimProfiler::with_defaults(),
            classifier,
            aggregator: ScoreAggregator::default(),
            settings: EngineSettings::default(),
        }
    }

    /// Built-in tables and the heuristic stance classifier.
    pub fn with_defaults() -> Self {
        Self::new(
            SourceWeightRegistry::with_defaults(),
            RegionalMatcher::with_defaults(),
            Arc::new(HeuristicClassifier::new()),
        )
    }

    /// Tables from `SOURCE_PROFILES_PATH` / `REGIONS_PATH` / `CATEGORIES_PATH`
    /// (built-in seed for each one unset or unreadable), settings from env.
    pub fn from_env() -> Self {
        let paths = TablePaths::from_env();
        Self::new(
            SourceWeightRegistry::from_path(paths.sources.as_deref()),
            RegionalMatcher::from_path(paths.regions.as_deref()),
            Arc::new(HeuristicClassifier::new()),
        )
        .with_profiler(ClaimProfiler::from_path(paths.categories.as_deref()))
        .with_settings(EngineSettings::from_env())
    }

    pub fn with_profiler(mut self, profiler: ClaimProfiler) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_confidence_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.aggregator = ScoreAggregator::new(weights);
        self
    }

    pub fn registry(&self) -> &SourceWeightRegistry {
        &self.registry
    }

    pub fn regions(&self) -> &RegionalMatcher {
        &self.regions
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn profile_claim(&self, text: &str) -> Claim {
        self.profiler.profile(text, &self.regions)
    }

    /// Score `evidence` for `claim` as of `now`. Never fails.
    pub fn verify(&self, claim: &str, evidence: &[Evidence], now: DateTime<Utc>) -> ScoreBreakdown {
        let claim = self.profile_claim(claim);
        let claim_regions = self.regions.detect_regions("", &claim.text);
        let recency = RecencyModel::at(now);

        let cleaned: Vec<Evidence> = evidence.iter().map(Evidence::cleaned).collect();
        let (kept, dropped) = dedup_by_title(cleaned, self.settings.duplicate_title_threshold);

        let items: Vec<ScoredEvidence> = kept
            .iter()
            .map(|e| self.score_item(&claim, &claim_regions, e, &recency))
            .collect();

        let truth = self.aggregator.truth_score(&items);
        let confidence = self.aggregator.confidence_score(&items);
        let out = ScoreBreakdown::assemble(
            truth,
            confidence,
            claim.category.clone(),
            claim.region.clone(),
            items,
            dropped,
            self.classifier.name(),
        );

        // Never log raw claim text.
        info!(
            target: "engine",
            id = %claim_id(&claim.text),
            evidence = out.breakdown.evidence_count,
            dropped = out.dropped_duplicates.len(),
            truth = out.truth_score,
            confidence = out.confidence_score,
            verdict = %out.verdict,
            classifier = out.classifier.as_str(),
            "claim verified"
        );
        out
    }

    /// Weight one (already cleaned) evidence item.
    pub fn score_item(
        &self,
        claim: &Claim,
        claim_regions: &[String],
        item: &Evidence,
        recency: &RecencyModel,
    ) -> ScoredEvidence {
        let claim_text = truncate_chars(&claim.text, self.settings.max_claim_chars);
        let (similarity, stance, stance_score) = match (item.similarity, item.stance) {
            (Some(sim), Some(stance)) => (sim, Some(stance), None),
            (pre_sim, pre_stance) if self.settings.classify_untagged => {
                let text = item.candidate_text(self.settings.max_candidate_chars);
                let j = self.classifier.classify(claim_text, &text);
                (
                    pre_sim.unwrap_or(j.similarity),
                    pre_stance.or(Some(j.stance)),
                    pre_stance.is_none().then_some(j.score),
                )
            }
            (pre_sim, pre_stance) => {
                let sim = pre_sim.unwrap_or_else(|| {
                    lexical_similarity(
                        claim_text,
                        &item.candidate_text(self.settings.max_candidate_chars),
                    )
                });
                (sim, pre_stance, None)
            }
        };

        let domain = self.registry.resolve_domain(&item.url, &item.source);
        let profile = self.registry.profile_of(&domain);
        let source_weight = self
            .registry
            .components_of(&profile, &claim.category, &claim.region)
            .total();
        let detected = self.item_regions(claim_regions, item);
        let boost = self.regions.boost_for_domain(&domain, &detected);

        ScoredEvidence::new(
            domain,
            item.title.clone(),
            source_weight,
            boost,
            recency.factor(item.published_at.as_deref()),
            similarity,
            stance,
            stance_score,
        )
    }

    /// Regions of the claim plus regions of the item's own text, in table order.
    fn item_regions(&self, claim_regions: &[String], item: &Evidence) -> Vec<String> {
        let mut detected: Vec<String> = claim_regions.to_vec();
        for r in self.regions.detect_regions(&item.content, &item.title) {
            if !detected.contains(&r) {
                detected.push(r);
            }
        }
        detected
    }
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Short SHA-256 prefix (12 hex chars) identifying a claim in logs.
pub fn claim_id(text: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
