use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only projection over the rate monitor's event log, recomputed from
/// the log at query time. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub requests_last_60_seconds: usize,
    pub requests_last_60_minutes: usize,
    pub last_status: Option<u16>,
    pub last_endpoint: Option<String>,
    /// Timestamp of the most recent 429 response, if any in retention.
    pub last_rate_limited_at: Option<DateTime<Utc>>,
    /// Calendar-boundary cost sums (not rolling windows).
    pub estimated_cost_today_usd: f64,
    pub estimated_cost_this_week_usd: f64,
    pub estimated_cost_this_month_usd: f64,
    /// Rate-limit headers from the most recent call, echoed verbatim.
    pub rate_limit_headers: Vec<(String, String)>,
}
