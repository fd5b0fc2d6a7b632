//! Transport selection and the retry policy for relay calls.
//!
//! One router per configuration snapshot. The gateway path is exactly-once:
//! a resent `chat.send` could double-run the turn, so transport failures
//! there surface immediately. The local CLI path is idempotent from the
//! caller's view and gets a single retry on transient failures.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use sotto_types::{RelayConfig, RelayDiagnostics, RelayError, RelayRequest, RelayResult};

use crate::compose;
use crate::extract;
use crate::gateway::GatewayClient;
use crate::process::{ProcessBridge, DEFAULT_TIMEOUT};

/// Case-insensitive markers of transient failures worth one retry.
/// "temporar" covers both "temporary failure" and "resource temporarily
/// unavailable".
const RETRYABLE_MARKERS: &[&str] = &["timed out", "temporar", "connection reset", "network error"];

/// Whether an error message looks transient enough to retry.
pub fn is_retryable(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RETRYABLE_MARKERS.iter().any(|m| lowered.contains(m))
}

pub struct RelayRouter {
    config: RelayConfig,
    bridge: ProcessBridge,
    gateway: GatewayClient,
    cli_timeout: Duration,
}

impl RelayRouter {
    pub fn new(config: RelayConfig) -> Self {
        let bridge = ProcessBridge::new(config.cli.clone());
        let gateway = GatewayClient::new(config.gateway.clone());
        Self {
            config,
            bridge,
            gateway,
            cli_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_cli_timeout(mut self, timeout: Duration) -> Self {
        self.cli_timeout = timeout;
        self
    }

    /// Relay one turn over whichever transport the configuration selects.
    pub async fn send(&self, request: &RelayRequest) -> Result<RelayResult, RelayError> {
        let started = Instant::now();
        let (text, retry_count) = if self.config.gateway.enabled {
            (self.gateway.send(request).await?, 0)
        } else {
            self.send_via_cli(request).await?
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "relay call finished in {duration_ms}ms (retries: {retry_count}, reply: {} chars)",
            text.len()
        );
        Ok(RelayResult {
            text,
            retry_count,
            duration_ms,
        })
    }

    async fn send_via_cli(&self, request: &RelayRequest) -> Result<(String, u32), RelayError> {
        let args = self.cli_args(request);
        match self.run_cli_once(&args).await {
            Ok(text) => Ok((text, 0)),
            Err(err) if is_retryable(&err.to_string()) => {
                warn!("transient agent failure, retrying once: {err}");
                let text = self.run_cli_once(&args).await?;
                Ok((text, 1))
            }
            Err(err) => Err(err),
        }
    }

    async fn run_cli_once(&self, args: &[String]) -> Result<String, RelayError> {
        let stdout = self.bridge.run(args, self.cli_timeout).await?;
        extract::parse_cli_reply(&stdout)
    }

    fn cli_args(&self, request: &RelayRequest) -> Vec<String> {
        vec![
            "agent".to_string(),
            "--agent".to_string(),
            request.agent_id.clone(),
            "--session-id".to_string(),
            request.session_key.clone(),
            "--message".to_string(),
            compose::composed_text(request),
            "--json".to_string(),
        ]
    }

    /// Inspect the configured transport without relaying anything. Always
    /// returns a record; failures become `reachable: false` with detail.
    pub async fn diagnostics(&self) -> RelayDiagnostics {
        if self.config.gateway.enabled {
            let reachable = self.gateway.ping().await;
            return RelayDiagnostics {
                transport: "gateway".to_string(),
                target: self.config.gateway.url.clone(),
                runtime: None,
                reachable,
                detail: if reachable {
                    "connect handshake succeeded".to_string()
                } else {
                    "connect handshake failed".to_string()
                },
            };
        }

        match self.bridge.binary_path().await {
            Err(err) => RelayDiagnostics {
                transport: "cli".to_string(),
                target: self.config.cli.binary_name.clone(),
                runtime: None,
                reachable: false,
                detail: err.to_string(),
            },
            Ok(path) => {
                let runtime = script_runtime(&path);
                let probe = self
                    .bridge
                    .run(
                        &["status".to_string(), "--json".to_string()],
                        Duration::from_secs(5),
                    )
                    .await;
                let (reachable, detail) = match probe {
                    Ok(_) => (true, "status probe succeeded".to_string()),
                    Err(err) => (false, err.to_string()),
                };
                RelayDiagnostics {
                    transport: "cli".to_string(),
                    target: path.to_string_lossy().into_owned(),
                    runtime,
                    reachable,
                    detail,
                }
            }
        }
    }
}

/// Interpreter named in the binary's shebang line, if it is a script.
/// Agent CLIs are commonly Node entry points behind `#!/usr/bin/env node`.
fn script_runtime(path: &Path) -> Option<String> {
    let head = std::fs::read(path).ok()?;
    let head = head.get(..head.len().min(256))?;
    if !head.starts_with(b"#!") {
        return None;
    }
    let line = head.split(|&b| b == b'\n').next()?;
    let line = String::from_utf8_lossy(&line[2..]);
    line.split_whitespace()
        .last()
        .map(|token| token.rsplit('/').next().unwrap_or(token).to_string())
}
