//! Evidence records as handed over by the retrieval stage.
//!
//! Input shape: `{url, source, title, content, publishedAt?, similarity?, stance?}`.
//! Older producers spell the optional fields `published_date` and
//! `similarity_score`; both spellings are accepted.

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use strsim::normalized_levenshtein;

use crate::source_weights::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Supporting,
    Contradicting,
    Neutral,
}

impl Stance {
    pub fn as_str(self) -> &'static str {
        match self {
            Stance::Supporting => "supporting",
            Stance::Contradicting => "contradicting",
            Stance::Neutral => "neutral",
        }
    }

    /// Lenient tag parsing: case-insensitive, verb forms accepted.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "supporting" | "support" | "supports" | "supported" => Some(Stance::Supporting),
            "contradicting" | "contradict" | "contradicts" | "contradicted" | "refutes"
            | "refuting" => Some(Stance::Contradicting),
            "neutral" => Some(Stance::Neutral),
            _ => None,
        }
    }
}

/// Unknown or non-string stance tags count as untagged.
fn lenient_stance<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Stance>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Tag(String),
        Other(IgnoredAny),
    }
    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Tag(t)) => Stance::parse(&t),
        Some(Raw::Other(_)) | None => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    #[serde(default)]
    pub url: String,
    /// Outlet name as reported by the retriever (e.g. "Reuters").
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "snippet")]
    pub content: String,
    /// ISO/RFC timestamp or relative text ("3 hours ago").
    #[serde(default, alias = "published_at", alias = "published_date")]
    pub published_at: Option<String>,
    #[serde(default, alias = "similarity_score")]
    pub similarity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_stance")]
    pub stance: Option<Stance>,
}

impl Evidence {
    pub fn new(
        url: impl Into<String>,
        source: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
            title: title.into(),
            content: content.into(),
            published_at: None,
            similarity: None,
            stance: None,
        }
    }

    pub fn published(mut self, when: impl Into<String>) -> Self {
        self.published_at = Some(when.into());
        self
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn with_stance(mut self, stance: Stance) -> Self {
        self.stance = Some(stance);
        self
    }

    /// Decoded, whitespace-collapsed copy. Out-of-range or NaN similarity is
    /// clamped / discarded.
    pub fn cleaned(&self) -> Self {
        Self {
            url: self.url.trim().to_string(),
            source: self.source.trim().to_string(),
            title: clean_text(&self.title),
            content: clean_text(&self.content),
            published_at: self
                .published_at
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            similarity: self
                .similarity
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(0.0, 1.0)),
            stance: self.stance,
        }
    }

    /// `title + " " + content`, cut to at most `max_chars` characters.
    pub fn candidate_text(&self, max_chars: usize) -> String {
        let joined = match (self.title.is_empty(), self.content.is_empty()) {
            (true, _) => self.content.clone(),
            (false, true) => self.title.clone(),
            (false, false) => format!("{} {}", self.title, self.content),
        };
        truncate_chars(&joined, max_chars).to_string()
    }
}

/// Decode HTML entities and collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix of `s` with at most `max_chars` characters (never splits a char).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Keep the first of every group of near-duplicate titles.
///
/// Returns `(kept, dropped_titles)`; input order is preserved.
pub fn dedup_by_title(items: Vec<Evidence>, threshold: f64) -> (Vec<Evidence>, Vec<String>) {
    let mut kept: Vec<Evidence> = Vec::with_capacity(items.len());
    let mut seen: Vec<String> = Vec::new();
    let mut dropped = Vec::new();

    for item in items {
        let key = normalize(&item.title);
        if key.is_empty() {
            kept.push(item);
            continue;
        }
        let dup = seen
            .iter()
            .any(|prev| normalized_levenshtein(prev, &key) >= threshold);
        if dup {
            dropped.push(item.title);
        } else {
            seen.push(key);
            kept.push(item);
        }
    }
    (kept, dropped)
}
