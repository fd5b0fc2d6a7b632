use serde::{Deserialize, Serialize};

/// Configuration for one relay router. Read-only inputs, refreshed by the
/// caller at the start of each call — the core never reads global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub agent_id: String,
    pub session_key: String,
    pub gateway: GatewaySettings,
    pub cli: CliSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// When true, calls go over the gateway socket instead of the local CLI.
    pub enabled: bool,
    pub url: String,
    /// Opaque bearer token, forwarded as-is. Empty means "send none".
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    /// Name of the agent CLI binary to resolve on this machine.
    pub binary_name: String,
    /// Explicit path override; checked before any search.
    #[serde(default)]
    pub path_override: Option<String>,
    /// Override for the agent CLI's home directory. Its `bin/` subdirectory
    /// joins the candidate list and the child inherits it as HOME.
    #[serde(default)]
    pub home_override: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            agent_id: "main".to_string(),
            session_key: "default".to_string(),
            gateway: GatewaySettings {
                enabled: false,
                url: "ws://127.0.0.1:18789".to_string(),
                token: String::new(),
            },
            cli: CliSettings {
                binary_name: "openclaw".to_string(),
                path_override: None,
                home_override: None,
            },
        }
    }
}
