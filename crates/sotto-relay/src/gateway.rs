//! Gateway client — one duplex-socket session per relay call.
//!
//! Each `send` walks the v3 protocol in order: challenge, `connect`,
//! `chat.send`, ack, then the run's event stream. The gateway may multiplex
//! unrelated sessions on one socket, so only events whose run id matches the
//! acknowledged run are processed. The socket never outlives the call.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use sotto_types::{GatewaySettings, RelayError, RelayRequest};

use crate::compose;
use crate::protocol::{
    AgentEventPayload, ChatEventPayload, ChatSendAck, ChatSendParams, ConnectParams, InboundFrame,
    RequestFrame, ResponseFrame, EVENT_AGENT, EVENT_CHAT, EVENT_CONNECT_CHALLENGE,
};

/// Scopes requested at connect time.
const REQUESTED_SCOPES: &[&str] = &["operator.read", "operator.write"];

/// Deadlines for each protocol phase. Defaults match the production
/// gateway; tests shrink them.
#[derive(Debug, Clone)]
pub struct GatewayTimeouts {
    /// Challenge and connect-response reads.
    pub handshake: Duration,
    /// Overall deadline for the chat.send ack.
    pub ack: Duration,
    /// Overall deadline for the run's event stream.
    pub stream: Duration,
    /// Bound on a single socket read while polling.
    pub poll: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            handshake: Duration::from_secs(10),
            ack: Duration::from_secs(15),
            stream: Duration::from_secs(120),
            poll: Duration::from_secs(2),
        }
    }
}

/// The socket seam. Production uses a WebSocket; tests drive the state
/// machine through a scripted fake.
#[async_trait]
pub trait GatewayTransport: Send {
    async fn send_text(&mut self, text: String) -> Result<(), RelayError>;

    /// Next text frame from the gateway. `Ok(None)` means the peer closed;
    /// `Err(Timeout)` means nothing arrived within `timeout`.
    async fn recv_text(&mut self, timeout: Duration) -> Result<Option<String>, RelayError>;

    /// Close the underlying connection. Must be safe to call on any path.
    async fn close(&mut self);
}

// ─── WebSocket transport ──────────────────────────────────────────────────────

pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// Open a socket to the gateway, setting an Origin header derived from
    /// the URL — the gateway authenticates control connections partly by
    /// origin.
    pub async fn connect(url: &str) -> Result<Self, RelayError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| RelayError::Network(format!("invalid gateway URL {url}: {e}")))?;

        if let Some(origin) = origin_for_url(url) {
            let value = HeaderValue::from_str(&origin)
                .map_err(|e| RelayError::Network(format!("invalid origin {origin}: {e}")))?;
            request.headers_mut().insert(ORIGIN, value);
        }

        let (stream, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| RelayError::Network(format!("gateway connect failed: {e}")))?;
        Ok(Self { stream })
    }
}

/// HTTP origin for a ws/wss URL: secure scheme maps to its HTTP equivalent,
/// host and port are kept as written.
pub(crate) fn origin_for_url(url: &str) -> Option<String> {
    let request = url.into_client_request().ok()?;
    let uri = request.uri();
    let authority = uri.authority()?.as_str();
    let scheme = match uri.scheme_str() {
        Some("wss") | Some("https") => "https",
        _ => "http",
    };
    Some(format!("{scheme}://{authority}"))
}

#[async_trait]
impl GatewayTransport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), RelayError> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| RelayError::Network(format!("gateway send failed: {e}")))
    }

    async fn recv_text(&mut self, timeout: Duration) -> Result<Option<String>, RelayError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(RelayError::Timeout(timeout.as_secs()));
            }
            let next = tokio::time::timeout(remaining, self.stream.next())
                .await
                .map_err(|_| RelayError::Timeout(timeout.as_secs()))?;
            match next {
                None => return Ok(None),
                Some(Err(e)) => {
                    return Err(RelayError::Network(format!("gateway read failed: {e}")))
                }
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Close(_))) => return Ok(None),
                // Ping/pong/binary frames carry no protocol messages.
                Some(Ok(_)) => continue,
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

// ─── Completion detection ─────────────────────────────────────────────────────

/// Signals that can move a run toward completion. The transition is
/// idempotent: reaching "completed" twice is a no-op, not an error.
#[derive(Debug)]
enum RunSignal<'a> {
    /// Authoritative text from a chat event; replaces accumulated text.
    ChatText(&'a str),
    /// `state == "final"` on a chat event.
    ChatFinal,
    /// `phase == "end"` on an agent lifecycle event.
    LifecycleEnd,
    /// Assistant text from an agent event; backup only.
    AssistantText(&'a str),
}

#[derive(Debug, Default)]
struct RunState {
    /// Last-known-good reply text, overwritten as better signal arrives.
    text: Option<String>,
    /// Set once a chat event supplied text; blocks the assistant backup.
    chat_text_seen: bool,
    completed: bool,
}

impl RunState {
    fn apply(&mut self, signal: RunSignal<'_>) {
        match signal {
            RunSignal::ChatText(t) => {
                self.text = Some(t.to_string());
                self.chat_text_seen = true;
            }
            RunSignal::ChatFinal | RunSignal::LifecycleEnd => self.completed = true,
            RunSignal::AssistantText(t) => {
                if !self.chat_text_seen {
                    self.text = Some(t.to_string());
                }
            }
        }
    }
}

// ─── Client ───────────────────────────────────────────────────────────────────

pub struct GatewayClient {
    settings: GatewaySettings,
    timeouts: GatewayTimeouts,
}

impl GatewayClient {
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            settings,
            timeouts: GatewayTimeouts::default(),
        }
    }

    pub fn with_timeouts(settings: GatewaySettings, timeouts: GatewayTimeouts) -> Self {
        Self { settings, timeouts }
    }

    /// Relay one turn over the gateway. Opens a fresh socket, drives the
    /// protocol to completion, and closes the socket on every exit path.
    pub async fn send(&self, request: &RelayRequest) -> Result<String, RelayError> {
        let mut transport = WsTransport::connect(&self.settings.url).await?;
        self.run_session(&mut transport, request).await
    }

    /// Drive a full session over an already-open transport. The transport
    /// is closed before this returns, success or not.
    pub async fn run_session<T: GatewayTransport>(
        &self,
        transport: &mut T,
        request: &RelayRequest,
    ) -> Result<String, RelayError> {
        let outcome = self.drive(transport, request).await;
        transport.close().await;
        outcome
    }

    /// Reachability probe: handshake and `connect` only, never raising.
    pub async fn ping(&self) -> bool {
        match WsTransport::connect(&self.settings.url).await {
            Ok(mut transport) => {
                let ok = self.handshake_and_connect(&mut transport).await.is_ok();
                transport.close().await;
                ok
            }
            Err(e) => {
                debug!("gateway ping failed: {e}");
                false
            }
        }
    }

    async fn drive<T: GatewayTransport>(
        &self,
        transport: &mut T,
        request: &RelayRequest,
    ) -> Result<String, RelayError> {
        self.handshake_and_connect(transport).await?;

        // chat.send, idempotency-keyed by its own request id.
        let chat_id = Uuid::new_v4().to_string();
        let params = ChatSendParams {
            session_key: format!("agent:{}:{}", request.agent_id, request.session_key),
            message: compose::composed_text(request),
            idempotency_key: chat_id.clone(),
        };
        self.send_request(transport, &chat_id, "chat.send", serde_json::to_value(&params))
            .await?;

        let run_id = self.await_run_id(transport, &chat_id).await?;
        debug!("gateway assigned run {run_id}");

        self.stream_run(transport, &run_id).await
    }

    /// Protocol steps 1–3: challenge, connect request, connect response.
    async fn handshake_and_connect<T: GatewayTransport>(
        &self,
        transport: &mut T,
    ) -> Result<(), RelayError> {
        let first = transport
            .recv_text(self.timeouts.handshake)
            .await?
            .ok_or_else(|| RelayError::Network("gateway closed during handshake".to_string()))?;

        match parse_frame(&first)? {
            InboundFrame::Event(ev) if ev.event == EVENT_CONNECT_CHALLENGE => {}
            other => {
                return Err(RelayError::ProtocolViolation(format!(
                    "expected {EVENT_CONNECT_CHALLENGE} as first message, got {other:?}"
                )))
            }
        }

        let connect_id = Uuid::new_v4().to_string();
        let params = ConnectParams::new(
            REQUESTED_SCOPES.iter().map(|s| s.to_string()).collect(),
            &self.settings.token,
        );
        self.send_request(transport, &connect_id, "connect", serde_json::to_value(&params))
            .await?;

        let res = self
            .await_response(transport, &connect_id, self.timeouts.handshake)
            .await?;
        if !res.ok {
            return Err(RelayError::AuthFailed(res.error_message()));
        }
        Ok(())
    }

    async fn send_request<T: GatewayTransport>(
        &self,
        transport: &mut T,
        id: &str,
        method: &str,
        params: Result<serde_json::Value, serde_json::Error>,
    ) -> Result<(), RelayError> {
        let params = params
            .map_err(|e| RelayError::ProtocolViolation(format!("encoding {method}: {e}")))?;
        let frame = RequestFrame::new(id, method, params);
        let json = serde_json::to_string(&frame)
            .map_err(|e| RelayError::ProtocolViolation(format!("encoding {method}: {e}")))?;
        transport.send_text(json).await
    }

    /// Poll inbound messages until the response matching `id` arrives.
    /// Unrelated frames are ignored.
    async fn await_response<T: GatewayTransport>(
        &self,
        transport: &mut T,
        id: &str,
        overall: Duration,
    ) -> Result<ResponseFrame, RelayError> {
        let deadline = Instant::now() + overall;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(RelayError::Timeout(overall.as_secs()));
            }
            let poll = self.timeouts.poll.min(remaining);
            match transport.recv_text(poll).await {
                Ok(Some(text)) => {
                    if let InboundFrame::Response(res) = parse_frame(&text)? {
                        if res.id == id {
                            return Ok(res);
                        }
                        debug!("ignoring response for unrelated request {}", res.id);
                    }
                }
                Ok(None) => {
                    return Err(RelayError::Network(
                        "gateway closed while awaiting response".to_string(),
                    ))
                }
                Err(RelayError::Timeout(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Protocol step 5: wait for the chat.send ack and extract the run id.
    async fn await_run_id<T: GatewayTransport>(
        &self,
        transport: &mut T,
        chat_id: &str,
    ) -> Result<String, RelayError> {
        let res = self
            .await_response(transport, chat_id, self.timeouts.ack)
            .await?;
        if !res.ok {
            return Err(RelayError::ProtocolViolation(format!(
                "chat.send rejected: {}",
                res.error_message()
            )));
        }
        let ack: ChatSendAck = res
            .payload
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| RelayError::ProtocolViolation(format!("malformed chat.send ack: {e}")))?
            .unwrap_or(ChatSendAck { run_id: None });
        ack.run_id.ok_or_else(|| {
            RelayError::ProtocolViolation("chat.send ack carried no run id".to_string())
        })
    }

    /// Protocol step 6: consume run events until a completion signal or the
    /// stream deadline. Deadline with text is a partial success; deadline
    /// with nothing is a timeout.
    async fn stream_run<T: GatewayTransport>(
        &self,
        transport: &mut T,
        run_id: &str,
    ) -> Result<String, RelayError> {
        let deadline = Instant::now() + self.timeouts.stream;
        let mut run = RunState::default();

        loop {
            if run.completed {
                return Ok(run.text.unwrap_or_default());
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let poll = self.timeouts.poll.min(remaining);
            match transport.recv_text(poll).await {
                Ok(Some(text)) => self.apply_frame(&text, run_id, &mut run),
                Ok(None) => {
                    // Socket closed mid-run: surface what we have, if anything.
                    if run.text.is_some() {
                        warn!("gateway closed mid-run; returning partial reply");
                        return Ok(run.text.unwrap_or_default());
                    }
                    return Err(RelayError::Network(
                        "gateway closed before the run produced a reply".to_string(),
                    ));
                }
                Err(RelayError::Timeout(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        if let Some(text) = run.text {
            info!("run {run_id} hit the stream deadline; returning partial reply");
            return Ok(text);
        }
        Err(RelayError::Timeout(self.timeouts.stream.as_secs()))
    }

    /// Feed one inbound frame into the run state. Frames for other runs and
    /// frame shapes we cannot decode are ignored — the socket is shared.
    fn apply_frame(&self, text: &str, run_id: &str, run: &mut RunState) {
        let frame = match parse_frame(text) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("ignoring undecodable frame during run: {e}");
                return;
            }
        };
        let InboundFrame::Event(ev) = frame else {
            return;
        };
        let Some(payload) = ev.payload else { return };

        match ev.event.as_str() {
            EVENT_CHAT => {
                let Ok(chat) = serde_json::from_value::<ChatEventPayload>(payload) else {
                    return;
                };
                if chat.run_id.as_deref() != Some(run_id) {
                    return;
                }
                if let Some(text) = chat.first_text() {
                    run.apply(RunSignal::ChatText(text));
                }
                if chat.is_final() {
                    run.apply(RunSignal::ChatFinal);
                }
            }
            EVENT_AGENT => {
                let Ok(agent) = serde_json::from_value::<AgentEventPayload>(payload) else {
                    return;
                };
                if agent.run_id.as_deref() != Some(run_id) {
                    return;
                }
                if let Some(text) = agent.assistant_text() {
                    run.apply(RunSignal::AssistantText(text));
                }
                if agent.is_lifecycle_end() {
                    run.apply(RunSignal::LifecycleEnd);
                }
            }
            _ => {}
        }
    }
}

fn parse_frame(text: &str) -> Result<InboundFrame, RelayError> {
    serde_json::from_str(text)
        .map_err(|e| RelayError::ProtocolViolation(format!("malformed gateway frame: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn settings() -> GatewaySettings {
        GatewaySettings {
            enabled: true,
            url: "ws://gw.test:18789".to_string(),
            token: "tok-123".to_string(),
        }
    }

    fn fast_timeouts() -> GatewayTimeouts {
        GatewayTimeouts {
            handshake: Duration::from_millis(200),
            ack: Duration::from_millis(200),
            stream: Duration::from_millis(200),
            poll: Duration::from_millis(20),
        }
    }

    fn request() -> RelayRequest {
        RelayRequest::new("hello", "default", "main")
    }

    fn challenge() -> String {
        r#"{"type":"event","event":"connect.challenge","payload":{}}"#.to_string()
    }

    fn chat_event(run_id: &str, text: &str, state: &str) -> String {
        serde_json::json!({
            "type": "event",
            "event": "chat",
            "payload": {
                "runId": run_id,
                "state": state,
                "message": {"content": [{"type": "text", "text": text}]}
            }
        })
        .to_string()
    }

    fn agent_event(run_id: &str, stream: &str, data: serde_json::Value) -> String {
        serde_json::json!({
            "type": "event",
            "event": "agent",
            "payload": {"runId": run_id, "stream": stream, "data": data}
        })
        .to_string()
    }

    /// Scripted transport: answers connect and chat.send like the real
    /// gateway, then replays the queued run events.
    struct FakeTransport {
        inbound: VecDeque<String>,
        connect_ok: bool,
        ack_run_id: Option<String>,
        ack_without_run_id: bool,
        run_events: Vec<String>,
        sent: Vec<String>,
        closed: bool,
    }

    impl FakeTransport {
        fn new(first_message: String) -> Self {
            Self {
                inbound: VecDeque::from([first_message]),
                connect_ok: true,
                ack_run_id: Some("run-1".to_string()),
                ack_without_run_id: false,
                run_events: Vec::new(),
                sent: Vec::new(),
                closed: false,
            }
        }

        fn with_run_events(mut self, events: Vec<String>) -> Self {
            self.run_events = events;
            self
        }
    }

    #[async_trait]
    impl GatewayTransport for FakeTransport {
        async fn send_text(&mut self, text: String) -> Result<(), RelayError> {
            let frame: serde_json::Value = serde_json::from_str(&text).unwrap();
            let id = frame["id"].as_str().unwrap().to_string();
            match frame["method"].as_str() {
                Some("connect") => {
                    let res = if self.connect_ok {
                        serde_json::json!({"type":"res","id":id,"ok":true,"payload":{}})
                    } else {
                        serde_json::json!({
                            "type":"res","id":id,"ok":false,
                            "error":{"message":"bad token"}
                        })
                    };
                    self.inbound.push_back(res.to_string());
                }
                Some("chat.send") => {
                    let payload = if self.ack_without_run_id {
                        serde_json::json!({})
                    } else if let Some(run_id) = &self.ack_run_id {
                        serde_json::json!({"runId": run_id})
                    } else {
                        serde_json::json!({})
                    };
                    let res = serde_json::json!({
                        "type":"res","id":id,"ok":true,"payload":payload
                    });
                    self.inbound.push_back(res.to_string());
                    self.inbound.extend(self.run_events.drain(..));
                }
                _ => {}
            }
            self.sent.push(text);
            Ok(())
        }

        async fn recv_text(&mut self, timeout: Duration) -> Result<Option<String>, RelayError> {
            match self.inbound.pop_front() {
                Some(text) => Ok(Some(text)),
                None => {
                    // Simulate a quiet socket without busy-spinning the test.
                    tokio::time::sleep(timeout.min(Duration::from_millis(5))).await;
                    Err(RelayError::Timeout(timeout.as_secs()))
                }
            }
        }

        async fn close(&mut self) {
            self.closed = true;
        }
    }

    #[tokio::test]
    async fn non_challenge_first_message_is_protocol_violation() {
        let mut fake =
            FakeTransport::new(r#"{"type":"event","event":"tick","payload":{}}"#.to_string());
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let err = client.run_session(&mut fake, &request()).await.unwrap_err();
        assert!(matches!(err, RelayError::ProtocolViolation(_)));
        assert!(fake.closed, "socket must be closed before returning");
    }

    #[tokio::test]
    async fn rejected_connect_is_auth_failure() {
        let mut fake = FakeTransport::new(challenge());
        fake.connect_ok = false;
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let err = client.run_session(&mut fake, &request()).await.unwrap_err();
        match err {
            RelayError::AuthFailed(msg) => assert!(msg.contains("bad token")),
            other => panic!("expected AuthFailed, got {other:?}"),
        }
        assert!(fake.closed);
    }

    #[tokio::test]
    async fn happy_path_returns_final_chat_text() {
        let mut fake = FakeTransport::new(challenge())
            .with_run_events(vec![chat_event("run-1", "the answer", "final")]);
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let text = client.run_session(&mut fake, &request()).await.unwrap();
        assert_eq!(text, "the answer");
        assert!(fake.closed);

        // The chat.send frame carries the composed session key and an
        // idempotency key equal to its own request id.
        let chat_send: serde_json::Value = fake
            .sent
            .iter()
            .map(|s| serde_json::from_str::<serde_json::Value>(s).unwrap())
            .find(|f| f["method"] == "chat.send")
            .unwrap();
        assert_eq!(chat_send["params"]["sessionKey"], "agent:main:default");
        assert_eq!(chat_send["params"]["idempotencyKey"], chat_send["id"]);
        assert_eq!(chat_send["params"]["message"], "hello");
    }

    #[tokio::test]
    async fn events_for_other_runs_are_ignored() {
        let mut fake = FakeTransport::new(challenge()).with_run_events(vec![
            chat_event("run-2", "someone else's reply", "final"),
            chat_event("run-1", "mine", "final"),
        ]);
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let text = client.run_session(&mut fake, &request()).await.unwrap();
        assert_eq!(text, "mine");
    }

    #[tokio::test]
    async fn lifecycle_end_completes_without_final_flag() {
        let mut fake = FakeTransport::new(challenge()).with_run_events(vec![
            chat_event("run-1", "partial so far", "delta"),
            agent_event("run-1", "lifecycle", serde_json::json!({"phase": "end"})),
        ]);
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let text = client.run_session(&mut fake, &request()).await.unwrap();
        assert_eq!(text, "partial so far");
    }

    #[tokio::test]
    async fn assistant_text_is_backup_only() {
        // No chat text at all: the assistant stream supplies the reply.
        let mut fake = FakeTransport::new(challenge()).with_run_events(vec![
            agent_event("run-1", "assistant", serde_json::json!({"text": "backup reply"})),
            agent_event("run-1", "lifecycle", serde_json::json!({"phase": "end"})),
        ]);
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());
        let text = client.run_session(&mut fake, &request()).await.unwrap();
        assert_eq!(text, "backup reply");

        // Chat text present: the assistant stream must not overwrite it.
        let mut fake = FakeTransport::new(challenge()).with_run_events(vec![
            chat_event("run-1", "authoritative", "delta"),
            agent_event("run-1", "assistant", serde_json::json!({"text": "backup"})),
            agent_event("run-1", "lifecycle", serde_json::json!({"phase": "end"})),
        ]);
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());
        let text = client.run_session(&mut fake, &request()).await.unwrap();
        assert_eq!(text, "authoritative");
    }

    #[tokio::test]
    async fn deadline_with_text_is_partial_success() {
        let mut fake = FakeTransport::new(challenge())
            .with_run_events(vec![chat_event("run-1", "truncated answer", "delta")]);
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let text = client.run_session(&mut fake, &request()).await.unwrap();
        assert_eq!(text, "truncated answer");
    }

    #[tokio::test]
    async fn deadline_with_no_text_is_timeout() {
        let mut fake = FakeTransport::new(challenge());
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let err = client.run_session(&mut fake, &request()).await.unwrap_err();
        assert!(matches!(err, RelayError::Timeout(_)));
        assert!(fake.closed);
    }

    #[tokio::test]
    async fn ack_without_run_id_is_protocol_violation() {
        let mut fake = FakeTransport::new(challenge());
        fake.ack_without_run_id = true;
        let client = GatewayClient::with_timeouts(settings(), fast_timeouts());

        let err = client.run_session(&mut fake, &request()).await.unwrap_err();
        assert!(matches!(err, RelayError::ProtocolViolation(_)));
    }

    #[test]
    fn origin_maps_schemes_to_http() {
        assert_eq!(
            origin_for_url("wss://gw.example.com:8443/ws").as_deref(),
            Some("https://gw.example.com:8443")
        );
        assert_eq!(
            origin_for_url("ws://127.0.0.1:18789").as_deref(),
            Some("http://127.0.0.1:18789")
        );
    }
}
