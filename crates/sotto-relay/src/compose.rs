//! Message composition — turns a RelayRequest into the single text blob
//! both transports send. Attachments become a human-readable manifest; the
//! agent service reads the files itself from the listed paths.

use sotto_types::{AttachmentRef, RelayRequest};

/// Compose the outgoing message text. Without attachments this is the raw
/// input unchanged; with attachments, one manifest line per file is
/// appended in input order.
pub fn compose_message(text: &str, attachments: &[AttachmentRef]) -> String {
    if attachments.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + attachments.len() * 64);
    out.push_str(text);
    out.push_str("\n\nAttached files:");
    for att in attachments {
        out.push_str(&format!(
            "\n- {} ({}): {}",
            att.file_name, att.kind, att.path
        ));
    }
    out
}

/// Convenience wrapper over the request's own fields.
pub fn composed_text(request: &RelayRequest) -> String {
    compose_message(&request.text, &request.attachments)
}
