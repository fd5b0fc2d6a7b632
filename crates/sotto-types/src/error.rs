use thiserror::Error;

/// Errors a relay call can terminate with. Every variant carries enough
/// detail to render directly in a diagnostics panel.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    /// Socket, DNS, or other transport-layer failure.
    #[error("network error: {0}")]
    Network(String),

    /// A deadline elapsed at some protocol phase.
    #[error("timed out after {0} seconds")]
    Timeout(u64),

    /// The gateway explicitly rejected the connect handshake.
    #[error("gateway authentication failed: {0}")]
    AuthFailed(String),

    /// Malformed or out-of-sequence message, or unparsable payload.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// No candidate executable resolved.
    #[error("agent binary not found; checked: {}", .searched.join(", "))]
    ProcessNotFound { searched: Vec<String> },

    /// The agent process exited with a non-zero status.
    #[error("agent process failed: {0}")]
    ProcessFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_mentions_seconds() {
        let e = RelayError::Timeout(18);
        assert_eq!(e.to_string(), "timed out after 18 seconds");
    }

    #[test]
    fn not_found_lists_searched_locations() {
        let e = RelayError::ProcessNotFound {
            searched: vec!["/usr/local/bin/claw".into(), "/opt/homebrew/bin/claw".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("/usr/local/bin/claw"));
        assert!(msg.contains("/opt/homebrew/bin/claw"));
    }
}
