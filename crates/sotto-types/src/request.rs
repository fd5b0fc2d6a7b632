use serde::{Deserialize, Serialize};

/// One file reference carried alongside a conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub file_name: String,
    /// Absolute path on the local machine.
    pub path: String,
    /// MIME type or loose type label ("image/png", "pdf", ...).
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
}

/// A single conversational turn to relay to the agent service.
/// Built once per call; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
    /// Caller-chosen key identifying the conversation thread.
    pub session_key: String,
    pub agent_id: String,
}

impl RelayRequest {
    pub fn new(
        text: impl Into<String>,
        session_key: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
            session_key: session_key.into(),
            agent_id: agent_id.into(),
        }
    }
}

/// Successful outcome of one relay call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResult {
    /// Reply text, possibly empty.
    pub text: String,
    /// 0 on first-attempt success, 1 when a retry succeeded.
    pub retry_count: u32,
    pub duration_ms: u64,
}
