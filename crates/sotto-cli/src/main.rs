use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sotto_relay::{config, usage, RelayRouter};
use sotto_types::{AttachmentRef, RelayRequest};

#[derive(Parser)]
#[command(name = "sotto", version, about = "Sotto — relay conversational turns to your agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay one message and print the reply
    Send {
        /// Message text to relay
        message: String,
        /// Conversation thread key
        #[arg(long)]
        session: Option<String>,
        /// Agent to address
        #[arg(long)]
        agent: Option<String>,
        /// File to reference alongside the message (repeatable)
        #[arg(long)]
        attach: Vec<String>,
    },
    /// Show transport configuration and reachability
    Status,
    /// Show metered API usage and estimated cost
    Usage,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            message,
            session,
            agent,
            attach,
        } => {
            let cfg = config::load_config()?;
            let mut request = RelayRequest::new(
                message,
                session.unwrap_or_else(|| cfg.session_key.clone()),
                agent.unwrap_or_else(|| cfg.agent_id.clone()),
            );
            for path in &attach {
                request.attachments.push(attachment_from_path(path)?);
            }

            let router = RelayRouter::new(cfg);
            let result = router.send(&request).await?;
            println!("{}", result.text);
            Ok(())
        }
        Commands::Status => {
            let cfg = config::load_config()?;
            let router = RelayRouter::new(cfg.clone());
            let diag = router.diagnostics().await;

            println!("Sotto v{}", env!("CARGO_PKG_VERSION"));
            println!("Config: {}", config::config_path().display());
            println!("Agent: {} (session {})", cfg.agent_id, cfg.session_key);
            println!("Transport: {}", diag.transport);
            println!("Target: {}", diag.target);
            if let Some(runtime) = &diag.runtime {
                println!("Runtime: {runtime}");
            }
            println!(
                "Reachable: {} ({})",
                if diag.reachable { "yes" } else { "no" },
                diag.detail
            );
            Ok(())
        }
        Commands::Usage => {
            let path = usage::log_path();
            let snap = usage::snapshot(&path)?;

            println!("Usage log: {}", path.display());
            println!("Requests (last 60s): {}", snap.requests_last_60_seconds);
            println!("Requests (last 60m): {}", snap.requests_last_60_minutes);
            if let Some(status) = snap.last_status {
                println!(
                    "Last call: {status} {}",
                    snap.last_endpoint.unwrap_or_default()
                );
            }
            if let Some(at) = snap.last_rate_limited_at {
                println!("Last rate limit: {at}");
            }
            println!(
                "Estimated cost: ${:.4} today / ${:.4} this week / ${:.4} this month",
                snap.estimated_cost_today_usd,
                snap.estimated_cost_this_week_usd,
                snap.estimated_cost_this_month_usd
            );
            Ok(())
        }
    }
}

/// Build an attachment reference from a local path. The file must exist;
/// only its metadata travels with the message.
fn attachment_from_path(path: &str) -> Result<AttachmentRef> {
    let p = Path::new(path);
    let meta = std::fs::metadata(p).with_context(|| format!("cannot attach {path}"))?;
    let file_name = p
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let absolute = p
        .canonicalize()
        .with_context(|| format!("cannot resolve {path}"))?;
    Ok(AttachmentRef {
        file_name,
        path: absolute.to_string_lossy().into_owned(),
        kind: kind_for(p),
        byte_size: Some(meta.len()),
    })
}

fn kind_for(path: &Path) -> String {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png".to_string(),
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some("gif") => "image/gif".to_string(),
        Some("webp") => "image/webp".to_string(),
        Some("pdf") => "pdf".to_string(),
        Some("txt") | Some("md") => "text/plain".to_string(),
        Some(other) => other.to_string(),
        None => "file".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_common_extensions() {
        assert_eq!(kind_for(Path::new("shot.PNG")), "image/png");
        assert_eq!(kind_for(Path::new("notes.pdf")), "pdf");
        assert_eq!(kind_for(Path::new("readme.md")), "text/plain");
        assert_eq!(kind_for(Path::new("archive.tar")), "tar");
        assert_eq!(kind_for(Path::new("Makefile")), "file");
    }
}
