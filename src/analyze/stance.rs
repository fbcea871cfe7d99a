//! Stance classifiers: a deterministic lexical heuristic and an adapter that
//! puts an entailment model in front of it.

use anyhow::{bail, Result};
use tracing::warn;

use super::lexical::{cue_counts, entities, has_negation, lexical_similarity};
use super::{StanceClassifier, StanceJudgement};
use crate::evidence::truncate_chars;

pub const CUE_WEIGHT: f64 = 0.15;
pub const SIMILARITY_WEIGHT: f64 = 0.6;
/// Minimum similarity for a negation mismatch to force contradiction.
pub const NEGATION_MIN_SIMILARITY: f64 = 0.5;
pub const NEGATION_MIN_STANCE: f64 = 0.3;
/// Below this similarity, stance is halved when no entity is shared.
pub const ENTITY_GUARD_SIMILARITY: f64 = 0.7;
pub const ENTITY_GUARD_DAMPING: f64 = 0.5;

/// Characters of the claim / candidate sent to an embedding model.
pub const EMBED_CLAIM_CHARS: usize = 512;
pub const EMBED_TEXT_CHARS: usize = 1024;

/// Lexical-overlap stance detection. Pure and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Signed stance for a candidate whose similarity is already known.
    pub fn stance_score(&self, claim: &str, text: &str, similarity: f64) -> f64 {
        if has_negation(claim) != has_negation(text) && similarity >= NEGATION_MIN_SIMILARITY {
            return -similarity.max(NEGATION_MIN_STANCE).min(1.0);
        }

        let (support, contradict) = cue_counts(text);
        let mut stance = (support as f64 - contradict as f64) * CUE_WEIGHT
            + (similarity - 0.5) * SIMILARITY_WEIGHT;

        if similarity < ENTITY_GUARD_SIMILARITY {
            let claim_ents = entities(claim);
            let text_ents = entities(text);
            if claim_ents.intersection(&text_ents).next().is_none() {
                stance *= ENTITY_GUARD_DAMPING;
            }
        }
        stance.clamp(-1.0, 1.0)
    }
}

impl StanceClassifier for HeuristicClassifier {
    fn classify(&self, claim: &str, text: &str) -> StanceJudgement {
        if text.trim().is_empty() {
            return StanceJudgement::empty();
        }
        let similarity = lexical_similarity(claim, text);
        let score = self.stance_score(claim, text, similarity);
        StanceJudgement::from_scores(similarity, score)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Class probabilities from a natural-language-inference model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NliScores {
    pub entailment: f64,
    pub contradiction: f64,
    pub neutral: f64,
}

impl NliScores {
    /// Argmax → signed stance: `+entailment`, `-contradiction`, or 0.
    /// Ties favour entailment, then contradiction.
    pub fn stance(&self) -> f64 {
        let (e, c, n) = (self.entailment, self.contradiction, self.neutral);
        if e >= c && e >= n {
            e.min(1.0)
        } else if c >= e && c >= n {
            -c.min(1.0)
        } else {
            0.0
        }
    }

    fn is_valid(&self) -> bool {
        [self.entailment, self.contradiction, self.neutral]
            .iter()
            .all(|x| x.is_finite() && *x >= 0.0)
    }
}

/// Backend used by [`ModelBackedClassifier`].
pub trait EntailmentModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Entailment / contradiction / neutral scores for `(claim, text)`.
    fn entail(&self, claim: &str, text: &str) -> Result<NliScores>;

    /// Sentence embedding, if the backend has one. `Ok(None)` means
    /// "use lexical similarity instead".
    fn embed(&self, _text: &str) -> Result<Option<Vec<f32>>> {
        Ok(None)
    }
}

/// Entailment model in front, heuristic behind. Any model error drops the
/// whole judgement to the heuristic path; callers never see it.
pub struct ModelBackedClassifier<M: EntailmentModel> {
    model: M,
    fallback: HeuristicClassifier,
}

impl<M: EntailmentModel> ModelBackedClassifier<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            fallback: HeuristicClassifier,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn try_classify(&self, claim: &str, text: &str) -> Result<StanceJudgement> {
        let similarity = match self.embedding_similarity(claim, text)? {
            Some(s) => s,
            None => lexical_similarity(claim, text),
        };
        let scores = self.model.entail(claim, text)?;
        if !scores.is_valid() {
            bail!("entailment scores out of range: {scores:?}");
        }
        Ok(StanceJudgement::from_scores(similarity, scores.stance()))
    }

    fn embedding_similarity(&self, claim: &str, text: &str) -> Result<Option<f64>> {
        let Some(a) = self.model.embed(truncate_chars(claim, EMBED_CLAIM_CHARS))? else {
            return Ok(None);
        };
        let Some(b) = self.model.embed(truncate_chars(text, EMBED_TEXT_CHARS))? else {
            return Ok(None);
        };
        if a.len() != b.len() || a.is_empty() {
            bail!("embedding dimensions differ ({} vs {})", a.len(), b.len());
        }
        Ok(Some(cosine_similarity(&a, &b).clamp(0.0, 1.0)))
    }
}

impl<M: EntailmentModel> StanceClassifier for ModelBackedClassifier<M> {
    fn classify(&self, claim: &str, text: &str) -> StanceJudgement {
        if text.trim().is_empty() {
            return StanceJudgement::empty();
        }
        match self.try_classify(claim, text) {
            Ok(j) => j,
            Err(e) => {
                warn!(
                    target: "stance",
                    model = self.model.name(),
                    error = %format!("{e:#}"),
                    "model unavailable, using heuristic"
                );
                metrics::counter!("stance_degraded_total").increment(1);
                self.fallback.classify(claim, text)
            }
        }
    }

    fn name(&self) -> &'static str {
        self.model.name()
    }
}

/// Cosine of two equal-length vectors; 0 when either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut na = 0.0_f64;
    let mut nb = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na <= 0.0 || nb <= 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
