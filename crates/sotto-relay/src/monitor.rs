//! Concurrency-safe usage log for the metered upstream speech APIs, with
//! sliding-window aggregation for the diagnostics panel.
//!
//! The monitor is the only long-lived shared-mutable object in the relay
//! subsystem. A single mutex around the log is enough at the expected call
//! volume (tens of events per minute).

use std::sync::Mutex;

use chrono::{DateTime, Datelike, Duration, Utc};
use sotto_types::RateSnapshot;

/// How long recorded events are kept before pruning.
const RETENTION_DAYS: i64 = 45;

#[derive(Debug, Clone)]
struct UsageEvent {
    at: DateTime<Utc>,
    status: u16,
    endpoint: String,
    /// Zero unless the call succeeded — failed calls are never billed.
    cost_usd: f64,
    /// Header strings captured verbatim so upstream rate-limit semantics
    /// can evolve without touching this component.
    headers: Vec<(String, String)>,
}

#[derive(Default)]
pub struct RateMonitor {
    events: Mutex<Vec<UsageEvent>>,
}

impl RateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one upstream call to the log. `estimated_cost_usd` is stored
    /// only for 2xx responses; otherwise zero.
    pub fn record(
        &self,
        status: u16,
        headers: &[(String, String)],
        endpoint: &str,
        estimated_cost_usd: f64,
        at: DateTime<Utc>,
    ) {
        let cost_usd = if (200..300).contains(&status) {
            estimated_cost_usd
        } else {
            0.0
        };
        let mut events = self.events.lock().unwrap();
        events.push(UsageEvent {
            at,
            status,
            endpoint: endpoint.to_string(),
            cost_usd,
            headers: headers.to_vec(),
        });
        Self::prune(&mut events, at);
    }

    /// Recompute the aggregate view from the log. Read-only apart from
    /// opportunistic pruning of entries past the retention horizon.
    pub fn snapshot(&self, now: DateTime<Utc>) -> RateSnapshot {
        let mut events = self.events.lock().unwrap();
        Self::prune(&mut events, now);

        let minute_ago = now - Duration::seconds(60);
        let hour_ago = now - Duration::minutes(60);

        let mut snap = RateSnapshot::default();
        for ev in events.iter() {
            if ev.at > minute_ago && ev.at <= now {
                snap.requests_last_60_seconds += 1;
            }
            if ev.at > hour_ago && ev.at <= now {
                snap.requests_last_60_minutes += 1;
            }
            if ev.status == 429 {
                snap.last_rate_limited_at = Some(ev.at);
            }
            if same_day(ev.at, now) {
                snap.estimated_cost_today_usd += ev.cost_usd;
            }
            if same_week(ev.at, now) {
                snap.estimated_cost_this_week_usd += ev.cost_usd;
            }
            if same_month(ev.at, now) {
                snap.estimated_cost_this_month_usd += ev.cost_usd;
            }
        }

        if let Some(last) = events.last() {
            snap.last_status = Some(last.status);
            snap.last_endpoint = Some(last.endpoint.clone());
            snap.rate_limit_headers = last.headers.clone();
        }
        snap
    }

    fn prune(events: &mut Vec<UsageEvent>, now: DateTime<Utc>) {
        let horizon = now - Duration::days(RETENTION_DAYS);
        events.retain(|ev| ev.at >= horizon);
    }
}

// Calendar-boundary windows, not rolling ones.

fn same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

fn same_week(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.iso_week() == b.iso_week()
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
