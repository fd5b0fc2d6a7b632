//! Gateway wire protocol — JSON frames over a duplex socket, version 3.
//!
//! Outbound requests are `{"type":"req","id",...}`; the gateway answers with
//! `{"type":"res","id","ok",...}` and pushes `{"type":"event",...}`. Each
//! protocol phase gets a small typed shape decoded tolerantly: unknown
//! fields are ignored so the gateway can evolve without breaking us.

use serde::{Deserialize, Serialize};

/// Protocol version this client targets, negotiated as a min/max pair.
pub const PROTOCOL_VERSION: u32 = 3;

/// First inbound message after connecting must be this event.
pub const EVENT_CONNECT_CHALLENGE: &str = "connect.challenge";
pub const EVENT_CHAT: &str = "chat";
pub const EVENT_AGENT: &str = "agent";

// ─── Frames ───────────────────────────────────────────────────────────────────

/// Client → gateway RPC request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestFrame {
    pub r#type: &'static str, // always "req"
    pub id: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl RequestFrame {
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            r#type: "req",
            id: id.into(),
            method: method.into(),
            params: Some(params),
        }
    }
}

/// Any message the gateway can push at us, discriminated on `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum InboundFrame {
    #[serde(rename = "res")]
    Response(ResponseFrame),
    #[serde(rename = "event")]
    Event(EventFrame),
    /// The gateway may send frame types newer than this client knows.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseFrame {
    pub id: String,
    pub ok: bool,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ErrorShape>,
}

impl ResponseFrame {
    /// Human-readable server message for a failed response.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "unspecified gateway error".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventFrame {
    pub event: String,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorShape {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

// ─── Connect handshake ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub min_protocol: u32,
    pub max_protocol: u32,
    pub client: ClientInfo,
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<ConnectAuth>,
}

/// Static descriptor identifying this client to the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub id: &'static str,
    pub version: &'static str,
    pub platform: &'static str,
    pub mode: &'static str,
}

impl ClientInfo {
    pub fn this_client() -> Self {
        Self {
            id: "sotto",
            version: env!("CARGO_PKG_VERSION"),
            platform: std::env::consts::OS,
            mode: "operator",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectAuth {
    pub token: String,
}

impl ConnectParams {
    /// Connect params with the bearer token omitted when empty.
    pub fn new(scopes: Vec<String>, token: &str) -> Self {
        Self {
            min_protocol: PROTOCOL_VERSION,
            max_protocol: PROTOCOL_VERSION,
            client: ClientInfo::this_client(),
            scopes,
            auth: (!token.is_empty()).then(|| ConnectAuth {
                token: token.to_string(),
            }),
        }
    }
}

// ─── chat.send ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendParams {
    pub session_key: String,
    pub message: String,
    /// Equal to the request id, so a resent frame cannot double-run.
    pub idempotency_key: String,
}

/// Payload of a successful `chat.send` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendAck {
    #[serde(default)]
    pub run_id: Option<String>,
}

// ─── Run events ───────────────────────────────────────────────────────────────

/// Payload of a `chat` event. The first text-typed content item is the
/// authoritative reply text; `state == "final"` marks completion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEventPayload {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ChatEventPayload {
    /// First `text`-typed content item, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.message.as_ref()?.content.iter().find_map(|item| {
            if item.r#type.as_deref() == Some("text") {
                item.text.as_deref()
            } else {
                None
            }
        })
    }

    pub fn is_final(&self) -> bool {
        self.state.as_deref() == Some("final")
    }
}

/// Payload of an `agent` event — a lifecycle/assistant sub-stream used as a
/// backup completion and text source for legacy gateways.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEventPayload {
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub data: Option<AgentEventData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentEventData {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl AgentEventPayload {
    pub fn is_lifecycle_end(&self) -> bool {
        self.stream.as_deref() == Some("lifecycle")
            && self
                .data
                .as_ref()
                .and_then(|d| d.phase.as_deref())
                == Some("end")
    }

    /// Non-empty assistant text, if this is an assistant sub-stream event.
    pub fn assistant_text(&self) -> Option<&str> {
        if self.stream.as_deref() != Some("assistant") {
            return None;
        }
        self.data
            .as_ref()
            .and_then(|d| d.text.as_deref())
            .filter(|t| !t.is_empty())
    }
}
