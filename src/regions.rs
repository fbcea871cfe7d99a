//! Regional matching: which world regions a text is about, and whether an
//! outlet is a recognized authority for one of them.
//!
//! Keywords are matched case-insensitively on word boundaries, except
//! all-caps acronyms (`US`, `UK`), which must match exactly so that the
//! pronoun "us" is not a country. Each region's keyword list is compiled once
//! into a `RegexSet`, so one pass over the text yields the set of distinct
//! keywords that occur.

use regex::{RegexSet, RegexSetBuilder};
use std::path::Path;
use tracing::warn;

use crate::config::tables::{load_or_seed, RegionRecord, RegionTable};
use crate::source_weights::{clamp01, extract_domain, GLOBAL_REGION};

/// Multiplier for an outlet that is a curated authority for a detected region.
pub const REGIONAL_EXPERT_BOOST: f64 = 1.8;
/// Distinct keyword hits needed to detect a region anywhere in the text.
pub const MIN_KEYWORD_HITS: usize = 2;

/// Static region definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDefinition {
    pub name: String,
    pub keywords: Vec<String>,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone)]
struct CompiledRegion {
    def: RegionDefinition,
    // None when the region has no usable keywords.
    keywords: Option<RegexSet>,
}

#[derive(Debug, Clone)]
pub struct RegionalMatcher {
    regions: Vec<CompiledRegion>,
}

impl RegionalMatcher {
    pub fn from_table(table: RegionTable) -> Self {
        let regions = table
            .regions
            .into_iter()
            .filter_map(compile_region)
            .collect();
        Self { regions }
    }

    pub fn with_defaults() -> Self {
        Self::from_table(RegionTable::seed())
    }

    pub fn from_path(path: Option<&Path>) -> Self {
        Self::from_table(load_or_seed(path, RegionTable::seed))
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionDefinition> {
        self.regions.iter().map(|r| &r.def)
    }

    /// Regions the text is about, in table order.
    ///
    /// A region is included when at least two of its keywords occur in
    /// `title + text`, or when exactly one occurs and it is in the title.
    pub fn detect_regions(&self, text: &str, title: &str) -> Vec<String> {
        if text.trim().is_empty() && title.trim().is_empty() {
            return Vec::new();
        }
        let content = format!("{title} {text}");
        let mut out = Vec::new();
        for region in &self.regions {
            let Some(set) = &region.keywords else {
                continue;
            };
            let hits = set.matches(&content).iter().count();
            if hits >= MIN_KEYWORD_HITS || (hits == 1 && set.is_match(title)) {
                out.push(region.def.name.clone());
            }
        }
        out
    }

    /// Home region of a claim: the first region detected when the claim text
    /// is treated as a title (so a single keyword is enough), else `global`.
    pub fn region_of_claim(&self, claim: &str) -> String {
        self.detect_regions("", claim)
            .into_iter()
            .next()
            .unwrap_or_else(|| GLOBAL_REGION.to_string())
    }

    /// `REGIONAL_EXPERT_BOOST` if the source is a curated authority for one of
    /// `detected`, else 1.0. The URL host is used; the source name only when
    /// the URL has none.
    pub fn regional_boost(&self, url: &str, source_name: &str, detected: &[String]) -> f64 {
        if detected.is_empty() {
            return 1.0;
        }
        let mut domain = extract_domain(url);
        if domain.is_empty() {
            domain = source_name.trim().to_ascii_lowercase();
        }
        self.boost_for_domain(&domain, detected)
    }

    /// Same as [`regional_boost`](Self::regional_boost) for an already
    /// resolved domain.
    pub fn boost_for_domain(&self, domain: &str, detected: &[String]) -> f64 {
        if domain.is_empty() {
            return 1.0;
        }
        let expert = self
            .regions
            .iter()
            .filter(|r| detected.iter().any(|d| *d == r.def.name))
            .any(|r| r.def.domains.iter().any(|d| domain_matches(domain, d)));
        if expert {
            REGIONAL_EXPERT_BOOST
        } else {
            1.0
        }
    }

    /// Curated authority domains for `region` (empty for unknown regions).
    pub fn experts_for(&self, region: &str) -> &[String] {
        self.regions
            .iter()
            .find(|r| r.def.name == region)
            .map(|r| r.def.domains.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for RegionalMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Final article weight: base weight times regional boost, capped at 1.0.
pub fn apply_boost(base_weight: f64, boost: f64) -> f64 {
    clamp01(base_weight * boost)
}

/// `news.bbc.co.uk` matches `bbc.co.uk`; `notbbc.co.uk` does not.
fn domain_matches(domain: &str, curated: &str) -> bool {
    domain == curated
        || domain
            .strip_suffix(curated)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn is_acronym(keyword: &str) -> bool {
    keyword.chars().any(|c| c.is_ascii_alphabetic())
        && keyword.chars().all(|c| !c.is_alphabetic() || c.is_ascii_uppercase())
}

fn compile_region(r: RegionRecord) -> Option<CompiledRegion> {
    let name = r.name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    let keywords: Vec<String> = r
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| {
            if is_acronym(k) {
                k.to_string()
            } else {
                k.to_lowercase()
            }
        })
        .collect();
    let domains: Vec<String> = r
        .domains
        .iter()
        .map(|d| extract_domain(d))
        .filter(|d| !d.is_empty())
        .collect();

    let patterns: Vec<String> = keywords
        .iter()
        .map(|k| {
            if is_acronym(k) {
                format!(r"(?-i:\b{}\b)", regex::escape(k))
            } else {
                format!(r"\b{}\b", regex::escape(k))
            }
        })
        .collect();
    let set = if patterns.is_empty() {
        None
    } else {
        match RegexSetBuilder::new(&patterns).case_insensitive(true).build() {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(
                    target: "config",
                    region = %name,
                    error = %e,
                    "region keywords failed to compile"
                );
                None
            }
        }
    };

    Some(CompiledRegion {
        def: RegionDefinition {
            name,
            keywords,
            domains,
        },
        keywords: set,
    })
}
