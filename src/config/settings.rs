//! Runtime settings read from the environment (after `dotenvy` in the binary).

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_SOURCE_PROFILES_PATH: &str = "SOURCE_PROFILES_PATH";
pub const ENV_REGIONS_PATH: &str = "REGIONS_PATH";
pub const ENV_CATEGORIES_PATH: &str = "CATEGORIES_PATH";
pub const ENV_DUPLICATE_TITLE_THRESHOLD: &str = "DUPLICATE_TITLE_THRESHOLD";
pub const ENV_VERIFY_CACHE_TTL_MS: &str = "VERIFY_CACHE_TTL_MS";

pub const DEFAULT_DUPLICATE_TITLE_THRESHOLD: f64 = 0.92;
pub const DEFAULT_VERIFY_CACHE_TTL_MS: u64 = 10 * 60 * 1000;
/// Characters of `title + content` handed to the stance classifier.
pub const DEFAULT_MAX_CANDIDATE_CHARS: usize = 1000;
/// Characters of the claim compared against each candidate.
pub const DEFAULT_MAX_CLAIM_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub duplicate_title_threshold: f64,
    pub max_candidate_chars: usize,
    pub max_claim_chars: usize,
    /// Run the stance classifier on items that arrive without a stance tag.
    pub classify_untagged: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            duplicate_title_threshold: DEFAULT_DUPLICATE_TITLE_THRESHOLD,
            max_candidate_chars: DEFAULT_MAX_CANDIDATE_CHARS,
            max_claim_chars: DEFAULT_MAX_CLAIM_CHARS,
            classify_untagged: true,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        let mut s = Self::default();
        if let Some(t) = parse_unit_env(std::env::var(ENV_DUPLICATE_TITLE_THRESHOLD).ok()) {
            s.duplicate_title_threshold = t;
        }
        s
    }
}

/// Paths of external table files; `None` means "use the built-in seed".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePaths {
    pub sources: Option<PathBuf>,
    pub regions: Option<PathBuf>,
    pub categories: Option<PathBuf>,
}

impl TablePaths {
    pub fn from_env() -> Self {
        Self {
            sources: path_env(ENV_SOURCE_PROFILES_PATH),
            regions: path_env(ENV_REGIONS_PATH),
            categories: path_env(ENV_CATEGORIES_PATH),
        }
    }
}

pub fn cache_ttl_from_env() -> Duration {
    let ms = std::env::var(ENV_VERIFY_CACHE_TTL_MS)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_VERIFY_CACHE_TTL_MS);
    Duration::from_millis(ms)
}

fn path_env(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_unit_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
