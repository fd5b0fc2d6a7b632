use serde::{Deserialize, Serialize};

/// Read-only introspection record for the settings/diagnostics UI.
/// Recomputed on demand; never cached longer than one refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayDiagnostics {
    /// Which transport the router would use: "gateway" or "cli".
    pub transport: String,
    /// Resolved CLI path or the configured gateway URL.
    pub target: String,
    /// Detected script runtime (e.g. "node") when the CLI is a script.
    pub runtime: Option<String>,
    pub reachable: bool,
    /// Free-text detail, e.g. the resolution failure message.
    pub detail: String,
}
