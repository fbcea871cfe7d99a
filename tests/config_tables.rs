// tests/config_tables.rs
//
// External table files and env-driven engine construction.
//
// Covered:
// - SOURCE_PROFILES_PATH (TOML) replaces the built-in source table
// - REGIONS_PATH (JSON) replaces the built-in region table
// - CATEGORIES_PATH replaces the claim category keywords
// - unreadable / malformed files fall back to the built-in seed
// - DUPLICATE_TITLE_THRESHOLD reaches the engine

use serial_test::serial;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use veracity_engine::config::settings::{
    ENV_CATEGORIES_PATH, ENV_DUPLICATE_TITLE_THRESHOLD, ENV_REGIONS_PATH,
    ENV_SOURCE_PROFILES_PATH,
};
use veracity_engine::{RegionalMatcher, SourceWeightRegistry, VerificationEngine};

fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(content.as_bytes()).expect("write temp file");
    f.flush().expect("flush");
    f
}

fn clear_env() {
    for k in [
        ENV_SOURCE_PROFILES_PATH,
        ENV_REGIONS_PATH,
        ENV_CATEGORIES_PATH,
        ENV_DUPLICATE_TITLE_THRESHOLD,
    ] {
        std::env::remove_var(k);
    }
}

const SOURCES: &str = r#"
version = 9

[[source]]
domain = "gazette.example"
credibility = 0.95
category = "national"
region = "nordics"
expertise = ["politics"]

[aliases]
"the gazette" = "gazette.example"
"#;

const REGIONS_JSON: &str = r#"{
  "version": 4,
  "region": [
    { "name": "nordics", "keywords": ["oslo", "stockholm"], "domains": ["gazette.example"] }
  ]
}"#;

const CATEGORIES: &str = r#"
[[category]]
name = "fisheries"
keywords = ["salmon", "cod"]
"#;

#[test]
#[serial]
fn env_paths_replace_builtin_tables() {
    clear_env();
    let sources = temp_with(".toml", SOURCES);
    let regions = temp_with(".json", REGIONS_JSON);
    let cats = temp_with(".toml", CATEGORIES);
    std::env::set_var(ENV_SOURCE_PROFILES_PATH, sources.path());
    std::env::set_var(ENV_REGIONS_PATH, regions.path());
    std::env::set_var(ENV_CATEGORIES_PATH, cats.path());

    let engine = VerificationEngine::from_env();
    clear_env();

    assert_eq!(engine.registry().len(), 1);
    assert_eq!(engine.registry().version(), 9);
    assert!(engine.registry().profile_of("reuters.com").is_unknown());
    assert_eq!(engine.registry().resolve_domain("", "The Gazette"), "gazette.example");

    let claim = engine.profile_claim("Salmon prices fall in Oslo");
    assert_eq!(claim.category, "fisheries");
    assert_eq!(claim.region, "nordics");
    assert_eq!(engine.regions().experts_for("nordics"), ["gazette.example".to_string()]);
}

#[test]
#[serial]
fn broken_files_fall_back_to_seed() {
    clear_env();
    let bad = temp_with(".toml", "this is = not [valid toml");
    std::env::set_var(ENV_SOURCE_PROFILES_PATH, bad.path());
    std::env::set_var(ENV_REGIONS_PATH, "/definitely/not/here.toml");

    let engine = VerificationEngine::from_env();
    clear_env();

    let seed = SourceWeightRegistry::with_defaults();
    assert_eq!(engine.registry().len(), seed.len());
    assert_eq!(
        engine.regions().regions().count(),
        RegionalMatcher::with_defaults().regions().count()
    );
}

#[test]
#[serial]
fn duplicate_threshold_from_env() {
    clear_env();
    std::env::set_var(ENV_DUPLICATE_TITLE_THRESHOLD, "0.5");
    let engine = VerificationEngine::from_env();
    clear_env();
    assert!((engine.settings().duplicate_title_threshold - 0.5).abs() < 1e-12);
}

#[test]
fn from_path_none_is_seed() {
    let a = SourceWeightRegistry::from_path(None::<&Path>);
    assert_eq!(a.len(), SourceWeightRegistry::with_defaults().len());
}
