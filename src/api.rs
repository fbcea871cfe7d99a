use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::breakdown::ScoreBreakdown;
use crate::cache::{cache_key, ResponseCache};
use crate::engine::VerificationEngine;
use crate::evidence::Evidence;
use crate::metrics::record_verify;
use crate::source_weights::{SourceProfile, WeightComponents, GENERAL_CATEGORY, GLOBAL_REGION};

pub const CACHE_HEADER: &str = "x-verify-cache";

#[derive(Clone)]
pub struct AppState {
    engine: Arc<VerificationEngine>,
    cache: Arc<ResponseCache<Bytes>>,
}

impl AppState {
    pub fn new(engine: Arc<VerificationEngine>, cache: Arc<ResponseCache<Bytes>>) -> Self {
        Self { engine, cache }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/verify", post(verify))
        .route("/debug/source-profile", get(debug_source_profile))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyReq {
    claim: String,
    #[serde(default)]
    evidence: Vec<Evidence>,
    /// Reference instant for recency; defaults to "now".
    #[serde(default, alias = "as_of")]
    as_of: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Percent {
    truth: f64,
    confidence: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResp<'a> {
    #[serde(flatten)]
    result: &'a ScoreBreakdown,
    description: &'static str,
    percent: Percent,
    as_of: DateTime<Utc>,
}

#[derive(Serialize)]
struct ErrorResp {
    error: String,
}

fn error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResp { error: msg.into() })).into_response()
}

fn json_bytes(body: Bytes, cache: &'static str) -> Response {
    let mut resp = body.into_response();
    let h = resp.headers_mut();
    h.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    h.insert(CACHE_HEADER, HeaderValue::from_static(cache));
    resp
}

async fn verify(State(state): State<AppState>, body: Bytes) -> Response {
    let started = Instant::now();
    let key = cache_key(&body);

    if let Some(hit) = state.cache.get(&key) {
        record_verify(true, started.elapsed().as_secs_f64() * 1000.0);
        return json_bytes(hit, "HIT");
    }

    let req: VerifyReq = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return error(StatusCode::BAD_REQUEST, format!("invalid request: {e}")),
    };
    if req.claim.trim().is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "claim must not be empty");
    }

    let as_of = req.as_of.unwrap_or_else(Utc::now);
    // Scoring is CPU-bound; keep it off the async workers.
    let engine = state.engine.clone();
    let result = match tokio::task::spawn_blocking(move || {
        engine.verify(&req.claim, &req.evidence, as_of)
    })
    .await
    {
        Ok(r) => r,
        Err(e) => return error(StatusCode::INTERNAL_SERVER_ERROR, format!("scoring failed: {e}")),
    };
    let resp = VerifyResp {
        result: &result,
        description: result.verdict.description(),
        percent: Percent {
            truth: result.truth_percent(),
            confidence: result.confidence_percent(),
        },
        as_of,
    };
    let bytes = match serde_json::to_vec(&resp) {
        Ok(b) => Bytes::from(b),
        Err(e) => return error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    state.cache.insert(key, bytes.clone());
    record_verify(false, started.elapsed().as_secs_f64() * 1000.0);
    json_bytes(bytes, "MISS")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceProfileOut {
    query: String,
    known: bool,
    profile: SourceProfile,
    /// Components for a general claim with no region.
    components: WeightComponents,
    weight: f64,
}

async fn debug_source_profile(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<SourceProfileOut> {
    let query = q.get("domain").cloned().unwrap_or_default();
    let registry = state.engine.registry();
    let profile = registry.profile_of(&query);
    let components = registry.components_of(&profile, GENERAL_CATEGORY, GLOBAL_REGION);
    Json(SourceProfileOut {
        query,
        known: !profile.is_unknown(),
        weight: components.total(),
        components,
        profile,
    })
}
