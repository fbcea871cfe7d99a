use axum::{routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::warn;

// One global recorder per process; later inits reuse its handle.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose a static gauge for the cache TTL.
    pub fn init(ttl_ms: u64) -> Self {
        let handle = HANDLE
            .get_or_init(|| {
                // Use default buckets to avoid API differences across crate versions.
                match PrometheusBuilder::new().install_recorder() {
                    Ok(h) => h,
                    Err(e) => {
                        warn!(
                            target: "metrics",
                            error = %e,
                            "recorder already installed; /metrics will be empty"
                        );
                        PrometheusBuilder::new().build_recorder().handle()
                    }
                }
            })
            .clone();

        // Static gauge with current TTL (absolute TTL, no sliding refresh)
        gauge!("verify_cache_ttl_ms").set(ttl_ms as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One `/verify` request: total, hit/miss split, latency.
pub fn record_verify(cache_hit: bool, elapsed_ms: f64) {
    counter!("verify_requests_total").increment(1);
    if cache_hit {
        counter!("verify_cache_hits_total").increment(1);
    } else {
        counter!("verify_cache_misses_total").increment(1);
    }
    histogram!("verify_duration_ms").record(elapsed_ms);
}
