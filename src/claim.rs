//! Claim attributes used to bias source weighting: topical category and
//! home region.

use regex::{RegexSet, RegexSetBuilder};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use crate::config::tables::{load_or_seed, CategoryTable};
use crate::regions::RegionalMatcher;
use crate::source_weights::GENERAL_CATEGORY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub text: String,
    pub category: String,
    pub region: String,
}

/// Keyword-based category detector.
#[derive(Debug, Clone)]
pub struct ClaimProfiler {
    categories: Vec<(String, RegexSet)>,
}

impl ClaimProfiler {
    pub fn from_table(table: CategoryTable) -> Self {
        let mut categories = Vec::new();
        for c in table.categories {
            let name = c.name.trim().to_ascii_lowercase();
            let patterns: Vec<String> = c
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .map(|k| format!(r"\b{}\b", regex::escape(&k)))
                .collect();
            if name.is_empty() || patterns.is_empty() {
                continue;
            }
            match RegexSetBuilder::new(&patterns).case_insensitive(true).build() {
                Ok(set) => categories.push((name, set)),
                Err(e) => {
                    warn!(
                        target: "config",
                        category = %name,
                        error = %e,
                        "category keywords failed to compile"
                    )
                }
            }
        }
        Self { categories }
    }

    pub fn with_defaults() -> Self {
        Self::from_table(CategoryTable::seed())
    }

    pub fn from_path(path: Option<&Path>) -> Self {
        Self::from_table(load_or_seed(path, CategoryTable::seed))
    }

    /// Category with the most distinct keyword hits; first wins on ties;
    /// `general` when nothing matches.
    pub fn category_of(&self, text: &str) -> String {
        let mut best: Option<(&str, usize)> = None;
        for (name, set) in &self.categories {
            let hits = set.matches(text).iter().count();
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((name.as_str(), hits));
            }
        }
        best.map(|(n, _)| n.to_string()).unwrap_or_else(|| GENERAL_CATEGORY.to_string())
    }

    /// Normalize the claim text and derive its category and region.
    pub fn profile(&self, text: &str, regions: &RegionalMatcher) -> Claim {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Claim {
            category: self.category_of(&text),
            region: regions.region_of_claim(&text),
            text,
        }
    }
}

impl Default for ClaimProfiler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_weights::GLOBAL_REGION;

    #[test]
    fn category_by_keyword_hits() {
        let p = ClaimProfiler::with_defaults();
        assert_eq!(p.category_of("Apple stock hits record as market rallies"), "business");
        assert_eq!(p.category_of("The team won the championship final"), "sports");
        assert_eq!(p.category_of("The sky is blue"), GENERAL_CATEGORY);
    }

    #[test]
    fn profile_normalizes_and_derives_region() {
        let p = ClaimProfiler::with_defaults();
        let m = RegionalMatcher::with_defaults();
        let c = p.profile("  Flooding   in Nairobi\tdisplaces thousands ", &m);
        assert_eq!(c.text, "Flooding in Nairobi displaces thousands");
        assert_eq!(c.region, "africa");
        assert_eq!(p.profile("Water boils at 100 degrees", &m).region, GLOBAL_REGION);
    }

    #[test]
    fn ties_go_to_table_order() {
        let t: CategoryTable = toml::from_str(
            r#"
[[category]]
name = "alpha"
keywords = ["shared"]

[[category]]
name = "beta"
keywords = ["shared"]
"#,
        )
        .unwrap();
        let p = ClaimProfiler::from_table(t);
        assert_eq!(p.category_of("a shared word"), "alpha");
    }
}
