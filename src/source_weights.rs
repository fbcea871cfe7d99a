//! # Source Weights
//!
//! Maps a publication domain to a static [`SourceProfile`] (credibility,
//! reach tier, bias, fact-checking and editorial ratings, home region,
//! expertise areas) and turns that profile into a per-article weight in
//! `[0.0, 1.0]` for a given claim category and claim region.
//!
//! - Built once from [`SourceTable`] (see `config/sources.toml`), read-only
//!   afterwards; safe to share across threads without locking.
//! - Lookup order: exact domain → outlet-name alias → best partial domain
//!   match (shared labels) → default "unknown" profile.
//! - Pure: no I/O after construction, no clock, no randomness.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::claim::Claim;
use crate::config::tables::{load_or_seed, SourceRecord, SourceTable};
use crate::evidence::Evidence;
use crate::regions::{apply_boost, RegionalMatcher};

/// Weight of (credibility × multiplier) in the final source weight.
pub const CREDIBILITY_WEIGHT: f64 = 0.4;

pub const EXPERTISE_EXACT_BONUS: f64 = 0.25;
pub const EXPERTISE_GENERAL_BONUS: f64 = 0.15;
pub const EXPERTISE_OTHER_BONUS: f64 = 0.10;

pub const REGION_EXACT_BONUS: f64 = 0.20;
pub const REGION_GLOBAL_SOURCE_BONUS: f64 = 0.15;
pub const REGION_GLOBAL_CLAIM_BONUS: f64 = 0.12;
pub const REGION_OTHER_BONUS: f64 = 0.08;

/// Credibility assigned to domains the registry has never heard of.
pub const UNKNOWN_CREDIBILITY: f64 = 0.50;

pub const GLOBAL_REGION: &str = "global";
pub const GENERAL_CATEGORY: &str = "general";

/// Expertise tags that mark a general-purpose outlet.
const GENERAL_PURPOSE_TAGS: [&str; 3] = ["general", "breaking_news", "world_news"];

/// Reach of an outlet. `international` in older tables means `global`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachTier {
    #[serde(alias = "international")]
    Global,
    National,
    Regional,
    Local,
    #[default]
    Unknown,
}

impl ReachTier {
    /// Reach component of the source weight.
    pub fn reach_bonus(self) -> f64 {
        match self {
            ReachTier::Global => 0.15,
            ReachTier::National => 0.12,
            ReachTier::Regional => 0.08,
            ReachTier::Local | ReachTier::Unknown => 0.05,
        }
    }
}

/// Static credibility profile of one outlet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceProfile {
    pub domain: String,
    /// Base credibility in `[0, 1]`.
    pub credibility: f64,
    pub category: ReachTier,
    pub bias: String,
    pub fact_checking: String,
    pub editorial_standards: String,
    /// Home region tag (`global` for worldwide outlets).
    pub region: String,
    pub expertise: Vec<String>,
    /// `>= 1.0`, applied on top of `credibility`.
    pub multiplier: f64,
}

impl SourceProfile {
    /// Default profile for domains that are not in the table.
    pub fn unknown(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            credibility: UNKNOWN_CREDIBILITY,
            category: ReachTier::Unknown,
            bias: "center".to_string(),
            fact_checking: "fair".to_string(),
            editorial_standards: "medium".to_string(),
            region: "unknown".to_string(),
            expertise: vec![GENERAL_CATEGORY.to_string()],
            multiplier: 1.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == ReachTier::Unknown && self.region == "unknown"
    }

    /// Credibility with the multiplier applied, capped at 1.0.
    pub fn effective_credibility(&self) -> f64 {
        clamp01(self.credibility * self.multiplier)
    }

    pub fn is_general_purpose(&self) -> bool {
        self.expertise
            .iter()
            .any(|e| GENERAL_PURPOSE_TAGS.contains(&e.as_str()))
    }

    fn from_record(r: SourceRecord) -> Self {
        Self {
            domain: extract_domain(&r.domain),
            credibility: sanitize_unit(r.credibility, UNKNOWN_CREDIBILITY),
            category: r.category,
            bias: r.bias,
            fact_checking: r.fact_checking,
            editorial_standards: r.editorial_standards,
            region: r.region.trim().to_ascii_lowercase(),
            expertise: r
                .expertise
                .into_iter()
                .map(|e| e.trim().to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            multiplier: if r.multiplier.is_finite() {
                r.multiplier.max(1.0)
            } else {
                1.0
            },
        }
    }
}

/// Component-wise source weight, kept for the explainability map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightComponents {
    pub credibility: f64,
    pub expertise: f64,
    pub region: f64,
    pub reach: f64,
}

impl WeightComponents {
    pub fn total(&self) -> f64 {
        clamp01(self.credibility + self.expertise + self.region + self.reach)
    }
}

/// Read-only registry of source profiles.
#[derive(Debug, Clone)]
pub struct SourceWeightRegistry {
    // Sorted so partial matching is deterministic.
    profiles: BTreeMap<String, SourceProfile>,
    aliases: HashMap<String, String>,
    version: u32,
}

impl SourceWeightRegistry {
    pub fn from_table(table: SourceTable) -> Self {
        let mut profiles = BTreeMap::new();
        for r in table.sources {
            let p = SourceProfile::from_record(r);
            if !p.domain.is_empty() {
                profiles.insert(p.domain.clone(), p);
            }
        }
        let aliases = table
            .aliases
            .into_iter()
            .map(|(name, domain)| (normalize(&name), extract_domain(&domain)))
            .collect();
        Self {
            profiles,
            aliases,
            version: table.version,
        }
    }

    /// Built-in table from `config/sources.toml`.
    pub fn with_defaults() -> Self {
        Self::from_table(SourceTable::seed())
    }

    /// Load from a TOML/JSON file; falls back to the built-in table on error.
    pub fn from_path(path: Option<&Path>) -> Self {
        Self::from_table(load_or_seed(path, SourceTable::seed))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile for a URL or bare domain.
    ///
    /// Steps:
    /// 1. Exact domain match (after stripping scheme, `www.`, port, path).
    /// 2. Best partial match: one domain contains the other and they share
    ///    the most dot-separated labels (e.g. `edition.cnn.com` → `cnn.com`).
    /// 3. Default unknown profile (credibility 0.5, multiplier 1.0).
    pub fn profile_of(&self, url_or_domain: &str) -> SourceProfile {
        let domain = extract_domain(url_or_domain);
        if domain.is_empty() {
            return SourceProfile::unknown(domain);
        }
        if let Some(p) = self.profiles.get(&domain) {
            return p.clone();
        }
        if let Some(p) = self.partial_match(&domain) {
            return p.clone();
        }
        SourceProfile::unknown(domain)
    }

    /// Canonical domain for an evidence item: the URL host when present,
    /// otherwise the outlet-name alias, otherwise the normalized name itself.
    pub fn resolve_domain(&self, url: &str, source_name: &str) -> String {
        let host = extract_domain(url);
        if !host.is_empty() {
            return host;
        }
        let name = normalize(source_name);
        if let Some(d) = self.aliases.get(&name) {
            return d.clone();
        }
        if name.contains('.') && !name.contains(' ') {
            return extract_domain(&name);
        }
        name
    }

    /// Source weight of `url` for a claim of `claim_category` about `claim_region`.
    pub fn weight_of(&self, url: &str, claim_category: &str, claim_region: &str) -> f64 {
        self.components_of(&self.profile_of(url), claim_category, claim_region)
            .total()
    }

    /// Final weight of one article: source weight times the regional-expert
    /// boost for `detected` regions, capped at 1.0.
    pub fn article_weight(
        &self,
        evidence: &Evidence,
        claim: &Claim,
        matcher: &RegionalMatcher,
        detected: &[String],
    ) -> f64 {
        let domain = self.resolve_domain(&evidence.url, &evidence.source);
        let base = self
            .components_of(&self.profile_of(&domain), &claim.category, &claim.region)
            .total();
        apply_boost(base, matcher.boost_for_domain(&domain, detected))
    }

    /// Weighted sum of credibility, expertise match, region match and reach.
    pub fn components_of(
        &self,
        profile: &SourceProfile,
        claim_category: &str,
        claim_region: &str,
    ) -> WeightComponents {
        let category = claim_category.trim().to_ascii_lowercase();
        let region = claim_region.trim().to_ascii_lowercase();

        let expertise = if profile.expertise.iter().any(|e| *e == category) {
            EXPERTISE_EXACT_BONUS
        } else if profile.is_general_purpose() {
            EXPERTISE_GENERAL_BONUS
        } else {
            EXPERTISE_OTHER_BONUS
        };

        let region_bonus = if profile.region == region {
            REGION_EXACT_BONUS
        } else if profile.region == GLOBAL_REGION {
            REGION_GLOBAL_SOURCE_BONUS
        } else if region == GLOBAL_REGION {
            REGION_GLOBAL_CLAIM_BONUS
        } else {
            REGION_OTHER_BONUS
        };

        WeightComponents {
            credibility: profile.effective_credibility() * CREDIBILITY_WEIGHT,
            expertise,
            region: region_bonus,
            reach: profile.category.reach_bonus(),
        }
    }

    /// Domains with base credibility `>= min`, highest first.
    pub fn credibility_ranking(&self, min: f64) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .profiles
            .values()
            .filter(|p| p.credibility >= min)
            .map(|p| (p.domain.clone(), p.credibility))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    fn partial_match(&self, domain: &str) -> Option<&SourceProfile> {
        let labels: BTreeSet<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
        let mut best: Option<&SourceProfile> = None;
        let mut best_score = 0usize;
        for (known, profile) in &self.profiles {
            if !(domain.contains(known.as_str()) || known.contains(domain)) {
                continue;
            }
            let score = known.split('.').filter(|l| labels.contains(l)).count();
            if score > best_score {
                best_score = score;
                best = Some(profile);
            }
        }
        best
    }
}

impl Default for SourceWeightRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Host part of a URL, lower-cased, without `www.` or port.
/// Bare domains pass through (normalized the same way).
pub fn extract_domain(url: &str) -> String {
    let s = url.trim().to_ascii_lowercase();
    let rest = match s.find("://") {
        Some(i) => &s[i + 3..],
        None => s.as_str(),
    };
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    // Drop credentials and port.
    let host = host.rsplit('@').next().unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.contains(char::is_whitespace) {
        return String::new();
    }
    host.to_string()
}

/// Normalize an outlet name: lowercase, replace punctuation/dashes with spaces,
/// collapse multiple spaces into one.
pub(crate) fn normalize(s: &str) -> String {
    let mut out = s.trim().to_ascii_lowercase();

    for ch in ['—', '–', '-', '_', '/', '\\'] {
        out = out.replace(ch, " ");
    }
    out = out.replace(['\n', '\r', '\t', ',', '‚', '’', '\''], " ");

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clamp to [0.0, 1.0].
pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

fn sanitize_unit(x: f64, fallback: f64) -> f64 {
    if x.is_finite() {
        x.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
