//! Recency: publication time → decay factor in `[MIN_RECENCY, 1.0]`.
//!
//! The reference instant is always supplied by the caller, so the same input
//! yields the same factor no matter when it is evaluated.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Factor used when the timestamp is missing or cannot be parsed.
pub const DEFAULT_RECENCY: f64 = 0.5;
pub const MIN_RECENCY: f64 = 0.2;
pub const MAX_RECENCY: f64 = 1.0;

/// Absolute-age buckets: (max age in hours, exclusive) → factor.
const AGE_BUCKETS: [(f64, f64); 5] = [
    (1.0, 1.0),
    (6.0, 0.98),
    (24.0, 0.95),
    (72.0, 0.9),
    (168.0, 0.8),
];
const OLDER_THAN_A_WEEK: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyModel {
    now: DateTime<Utc>,
}

impl RecencyModel {
    /// Model evaluating ages relative to `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Decay factor for an ISO/RFC timestamp or a relative string such as
    /// "3 hours ago". Never fails; unknown input yields `DEFAULT_RECENCY`.
    pub fn factor(&self, published: Option<&str>) -> f64 {
        let Some(raw) = published.map(str::trim).filter(|s| !s.is_empty()) else {
            return DEFAULT_RECENCY;
        };
        let lower = raw.to_ascii_lowercase();
        if lower == "unknown" {
            return DEFAULT_RECENCY;
        }
        let f = if let Some(f) = relative_factor(&lower) {
            f
        } else if let Some(ts) = parse_timestamp(raw) {
            self.factor_for_time(ts)
        } else {
            DEFAULT_RECENCY
        };
        f.clamp(MIN_RECENCY, MAX_RECENCY)
    }

    /// Bucketed factor for an absolute time; future times count as age 0.
    pub fn factor_for_time(&self, published: DateTime<Utc>) -> f64 {
        let age_secs = (self.now - published).num_seconds().max(0);
        let age_hours = age_secs as f64 / 3600.0;
        AGE_BUCKETS
            .iter()
            .find(|(max_h, _)| age_hours < *max_h)
            .map(|(_, f)| *f)
            .unwrap_or(OLDER_THAN_A_WEEK)
    }
}

/// "N hours/days/weeks/months ago", "just now", "yesterday".
fn relative_factor(lower: &str) -> Option<f64> {
    if lower == "just now" || lower == "today" {
        return Some(1.0);
    }
    if lower == "yesterday" {
        return Some(0.95);
    }
    if !lower.contains("ago") {
        return None;
    }
    let f = if lower.contains("second") || lower.contains("minute") || lower.contains("hour") {
        1.0
    } else if lower.contains("day") {
        0.95
    } else if lower.contains("week") {
        0.9
    } else if lower.contains("month") {
        0.8
    } else {
        OLDER_THAN_A_WEEK
    };
    Some(f)
}

/// RFC 3339, RFC 2822, `YYYY-MM-DD[ T]HH:MM:SS` (UTC), `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
