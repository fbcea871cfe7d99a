//! Static lookup tables: source profiles, regions, claim categories.
//!
//! The tables are versioned TOML assets under `config/`. The copies in the
//! repository are embedded at compile time and act as the built-in seed; an
//! external file (TOML or JSON, same shape) can replace them at start-up.
//! A missing or malformed external file falls back to the seed.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::source_weights::ReachTier;

pub const SEED_SOURCES: &str = include_str!("../../config/sources.toml");
pub const SEED_REGIONS: &str = include_str!("../../config/regions.toml");
pub const SEED_CATEGORIES: &str = include_str!("../../config/categories.toml");

/// `config/sources.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct SourceTable {
    #[serde(default)]
    pub version: u32,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceRecord>,
    /// Outlet name → canonical domain.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    pub domain: String,
    pub credibility: f64,
    #[serde(default)]
    pub category: ReachTier,
    #[serde(default = "default_bias")]
    pub bias: String,
    #[serde(default = "default_fact_checking")]
    pub fact_checking: String,
    #[serde(default = "default_editorial")]
    pub editorial_standards: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_bias() -> String {
    "center".to_string()
}
fn default_fact_checking() -> String {
    "fair".to_string()
}
fn default_editorial() -> String {
    "medium".to_string()
}
fn default_region() -> String {
    "unknown".to_string()
}
fn default_multiplier() -> f64 {
    1.0
}

/// `config/regions.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct RegionTable {
    #[serde(default)]
    pub version: u32,
    #[serde(default, rename = "region")]
    pub regions: Vec<RegionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

/// `config/categories.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTable {
    #[serde(default)]
    pub version: u32,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SourceTable {
    pub fn seed() -> Self {
        toml::from_str(SEED_SOURCES).expect("embedded config/sources.toml is valid")
    }
}

impl RegionTable {
    pub fn seed() -> Self {
        toml::from_str(SEED_REGIONS).expect("embedded config/regions.toml is valid")
    }
}

impl CategoryTable {
    pub fn seed() -> Self {
        toml::from_str(SEED_CATEGORIES).expect("embedded config/categories.toml is valid")
    }
}

/// Load a table from an explicit path. Supports TOML or JSON.
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading table from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_table(&content, ext.as_str())
        .with_context(|| format!("parsing table {}", path.display()))
}

/// Load from `path` when given, otherwise (or on any error) use `seed`.
pub fn load_or_seed<T: DeserializeOwned>(path: Option<&Path>, seed: impl FnOnce() -> T) -> T {
    let Some(p) = path else {
        return seed();
    };
    match load_table(p) {
        Ok(t) => t,
        Err(e) => {
            warn!(
                target: "config",
                path = %p.display(),
                error = %format!("{e:#}"),
                "table load failed, using built-in seed"
            );
            seed()
        }
    }
}

fn parse_table<T: DeserializeOwned>(s: &str, hint_ext: &str) -> Result<T> {
    if hint_ext == "json" {
        return serde_json::from_str(s).map_err(|e| anyhow!("invalid JSON table: {e}"));
    }
    match toml::from_str(s) {
        Ok(v) => Ok(v),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported table format: {toml_err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_and_are_populated() {
        let s = SourceTable::seed();
        assert!(s.version >= 1);
        assert!(s.sources.iter().any(|r| r.domain == "reuters.com"));
        assert_eq!(s.aliases.get("reuters").map(String::as_str), Some("reuters.com"));

        let r = RegionTable::seed();
        assert_eq!(r.regions.len(), 7);
        assert!(r.regions.iter().all(|x| !x.keywords.is_empty() && !x.domains.is_empty()));

        let c = CategoryTable::seed();
        assert!(c.categories.iter().any(|x| x.name == "business"));
    }

    #[test]
    fn international_is_an_alias_for_global() {
        let t: SourceTable = toml::from_str(
            r#"
[[source]]
domain = "wire.example"
credibility = 0.9
category = "international"
"#,
        )
        .unwrap();
        assert_eq!(t.sources[0].category, ReachTier::Global);
        assert_eq!(t.sources[0].region, "unknown");
        assert!((t.sources[0].multiplier - 1.0).abs() < 1e-12);
    }

    #[test]
    fn json_tables_are_accepted() {
        let json = r#"{"region":[{"name":"nordics","keywords":["oslo"],"domains":["nrk.no"]}]}"#;
        let t: RegionTable = parse_table(json, "json").unwrap();
        assert_eq!(t.regions[0].name, "nordics");
        // Without an extension hint we try TOML first, then JSON.
        let t2: RegionTable = parse_table(json, "").unwrap();
        assert_eq!(t2.regions[0].domains, vec!["nrk.no".to_string()]);
    }

    #[test]
    fn missing_file_falls_back_to_seed() {
        let t = load_or_seed(
            Some(Path::new("__definitely_missing_regions__.toml")),
            RegionTable::seed,
        );
        assert_eq!(t.regions.len(), 7);
    }
}
