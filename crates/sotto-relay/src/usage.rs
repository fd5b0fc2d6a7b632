//! Durable usage log behind the rate monitor.
//!
//! Metered upstream calls append one JSON line each; readers replay the
//! file into a fresh `RateMonitor` and take a snapshot from it. An
//! append-only line format keeps writers crash-safe without a database,
//! and malformed lines (a torn write, an older record shape) are skipped
//! rather than failing the whole replay.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use sotto_types::RateSnapshot;

use crate::config;
use crate::monitor::RateMonitor;

/// One logged upstream call, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub at: DateTime<Utc>,
    pub status: u16,
    pub endpoint: String,
    pub estimated_cost_usd: f64,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

/// Returns the path to the usage log (~/.sotto/usage.jsonl)
pub fn log_path() -> PathBuf {
    config::sotto_home().join("usage.jsonl")
}

/// Append one call to the log, creating the file (and ~/.sotto/) on first
/// use.
pub fn append_record(path: &Path, record: &UsageRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let line = serde_json::to_string(record).context("Failed to serialize usage record")?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open usage log at {}", path.display()))?;
    writeln!(file, "{line}")
        .with_context(|| format!("Failed to append to usage log at {}", path.display()))?;
    Ok(())
}

/// Replay the log into a monitor. A missing file is an empty history, and
/// the monitor's own retention pruning applies during replay.
pub fn replay(path: &Path) -> Result<RateMonitor> {
    let monitor = RateMonitor::new();
    if !path.exists() {
        return Ok(monitor);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read usage log at {}", path.display()))?;
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<UsageRecord>(line) {
            Ok(rec) => monitor.record(
                rec.status,
                &rec.headers,
                &rec.endpoint,
                rec.estimated_cost_usd,
                rec.at,
            ),
            Err(e) => warn!("skipping malformed usage log line: {e}"),
        }
    }
    Ok(monitor)
}

/// Current aggregate view over the persisted log.
pub fn snapshot(path: &Path) -> Result<RateSnapshot> {
    Ok(replay(path)?.snapshot(Utc::now()))
}
