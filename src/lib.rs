// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyze;
pub mod api;
pub mod breakdown;
pub mod cache;
pub mod claim;
pub mod config;
pub mod engine;
pub mod evidence;
pub mod metrics;
pub mod recency;
pub mod regions;
pub mod scoring;
pub mod source_weights;
pub mod verdict;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{
    EntailmentModel, HeuristicClassifier, ModelBackedClassifier, NliScores, StanceClassifier,
    StanceJudgement,
};
pub use crate::api::create_router;
pub use crate::breakdown::ScoreBreakdown;
pub use crate::claim::Claim;
pub use crate::engine::VerificationEngine;
pub use crate::evidence::{Evidence, Stance};
pub use crate::recency::RecencyModel;
pub use crate::regions::RegionalMatcher;
pub use crate::source_weights::{SourceProfile, SourceWeightRegistry};
pub use crate::verdict::Verdict;

use anyhow::bail;
use axum::Router;
use std::sync::Arc;
use tracing::info;

use crate::api::AppState;
use crate::cache::ResponseCache;
use crate::config::settings::cache_ttl_from_env;

/// Full HTTP app (routes + `/metrics`), configured from the environment.
///
/// Call after `dotenvy::dotenv()` so `.env` values are visible.
pub async fn app() -> anyhow::Result<Router> {
    let ttl = cache_ttl_from_env();
    let metrics = crate::metrics::Metrics::init(ttl.as_millis() as u64);

    let engine = VerificationEngine::from_env();
    if engine.registry().is_empty() {
        bail!("source profile table has no entries");
    }
    info!(
        target: "engine",
        sources = engine.registry().len(),
        table_version = engine.registry().version(),
        regions = engine.regions().regions().count(),
        classifier = engine.classifier_name(),
        cache_ttl_ms = ttl.as_millis() as u64,
        "verification engine ready"
    );

    let state = AppState::new(Arc::new(engine), Arc::new(ResponseCache::new(ttl)));
    Ok(create_router(state).merge(metrics.router()))
}
