//! Lexical signals for stance detection: tokenization, overlap similarity,
//! negation and cue words, proper-noun entities.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use strsim::normalized_levenshtein;

#[derive(Debug, Deserialize)]
struct RawLexicon {
    negation: Vec<String>,
    support: Vec<String>,
    contradict: Vec<String>,
    stopwords: Vec<String>,
}

struct Lexicon {
    negation: HashSet<String>,
    support: HashSet<String>,
    contradict: HashSet<String>,
    stopwords: HashSet<String>,
}

static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../../config/stance_lexicon.json");
    let r: RawLexicon = serde_json::from_str(raw).expect("valid stance lexicon");
    let set = |v: Vec<String>| v.into_iter().map(|w| w.to_lowercase()).collect();
    Lexicon {
        negation: set(r.negation),
        support: set(r.support),
        contradict: set(r.contradict),
        stopwords: set(r.stopwords),
    }
});

static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-zA-Z0-9_-]{2,}\b").expect("valid entity regex"));

/// Alphanumeric tokens, lower-case.
pub fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

pub fn is_stopword(tok: &str) -> bool {
    LEXICON.stopwords.contains(tok)
}

/// Whether any negation word occurs in `text`.
pub fn has_negation(text: &str) -> bool {
    tokenize(text).any(|t| LEXICON.negation.contains(&t))
}

/// Distinct support and contradiction cue words present in `text`.
pub fn cue_counts(text: &str) -> (usize, usize) {
    let toks: HashSet<String> = tokenize(text).collect();
    let support = toks.iter().filter(|t| LEXICON.support.contains(*t)).count();
    let contradict = toks.iter().filter(|t| LEXICON.contradict.contains(*t)).count();
    (support, contradict)
}

/// Proper-noun-like tokens (capitalized, 3+ chars), lower-cased, stopwords dropped.
pub fn entities(text: &str) -> BTreeSet<String> {
    ENTITY_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|e| !is_stopword(e))
        .collect()
}

/// Relatedness of `candidate` to `claim` in `[0,1]`.
///
/// Max of
/// - token overlap: share of the claim's content words found in the candidate,
/// - fuzzy window: best normalized Levenshtein ratio between the claim and a
///   run of candidate tokens as long as the claim.
pub fn lexical_similarity(claim: &str, candidate: &str) -> f64 {
    let claim_toks: Vec<String> = tokenize(claim).collect();
    let cand_toks: Vec<String> = tokenize(candidate).collect();
    if claim_toks.is_empty() || cand_toks.is_empty() {
        return 0.0;
    }

    let mut content: HashSet<&str> = claim_toks
        .iter()
        .map(String::as_str)
        .filter(|t| !is_stopword(t))
        .collect();
    if content.is_empty() {
        content = claim_toks.iter().map(String::as_str).collect();
    }
    let cand_set: HashSet<&str> = cand_toks.iter().map(String::as_str).collect();
    let overlap = content.iter().filter(|t| cand_set.contains(*t)).count() as f64
        / content.len() as f64;

    let claim_joined = claim_toks.join(" ");
    let n = claim_toks.len().min(cand_toks.len());
    let window = cand_toks
        .windows(n)
        .map(|w| normalized_levenshtein(&claim_joined, &w.join(" ")))
        .fold(0.0_f64, f64::max);

    overlap.max(window).clamp(0.0, 1.0)
}
