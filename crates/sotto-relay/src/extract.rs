//! Locating the JSON payload inside noisy CLI output.
//!
//! The agent CLI may emit log lines before (and after) its JSON result, so
//! the decoder finds the first syntactically balanced `{...}` span that
//! parses as JSON — tracking brace depth and skipping braces inside quoted
//! strings — and decodes only that span.

use serde::Deserialize;
use sotto_types::RelayError;

/// Find the first balanced `{...}` span that parses as valid JSON.
/// Balanced-but-invalid spans (e.g. `{not json}`) are skipped.
pub fn first_json_object(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut search_from = 0;

    while let Some(rel) = input[search_from..].find('{') {
        let start = search_from + rel;
        if let Some(end) = balanced_end(bytes, start) {
            let span = &input[start..=end];
            if serde_json::from_str::<serde_json::Value>(span).is_ok() {
                return Some(span.to_string());
            }
        }
        // Invalid or unbalanced from this brace; try the next one.
        search_from = start + 1;
    }
    None
}

/// Index of the byte closing the object opened at `start`, or None if the
/// input ends before the braces balance.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ─── CLI reply payload ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CliReply {
    #[serde(default)]
    result: Option<CliResult>,
}

#[derive(Debug, Deserialize)]
struct CliResult {
    #[serde(default)]
    payloads: Vec<CliPayload>,
}

#[derive(Debug, Deserialize)]
struct CliPayload {
    #[serde(default)]
    text: Option<String>,
}

/// Decode the agent CLI's stdout into reply text. Expected shape is
/// `{"result":{"payloads":[{"text":"..."}]}}` with extra non-JSON lines
/// tolerated around it. An output with no parsable object is a protocol
/// violation; a parsable object with no text yields an empty reply.
pub fn parse_cli_reply(stdout: &[u8]) -> Result<String, RelayError> {
    let text = String::from_utf8_lossy(stdout);
    let span = first_json_object(&text).ok_or_else(|| {
        RelayError::ProtocolViolation(format!(
            "no JSON object in agent output ({} bytes)",
            stdout.len()
        ))
    })?;

    let reply: CliReply = serde_json::from_str(&span)
        .map_err(|e| RelayError::ProtocolViolation(format!("malformed agent payload: {e}")))?;

    let reply_text = reply
        .result
        .map(|r| {
            r.payloads
                .into_iter()
                .filter_map(|p| p.text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    Ok(reply_text)
}
