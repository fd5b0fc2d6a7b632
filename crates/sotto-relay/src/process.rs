//! Local subprocess bridge — resolves the agent CLI binary once, then runs
//! it to completion per call with captured output and a hard deadline.
//!
//! GUI-launched processes inherit a minimal PATH, so resolution cannot rely
//! on the parent environment alone: an explicit override, the PATH dirs, a
//! set of well-known install dirs, and finally a login-shell probe are tried
//! in that order. The first hit is cached for the life of the bridge.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use sotto_types::{CliSettings, RelayError};

/// Default wall-clock budget for one CLI invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(18);

/// Cap on captured stdout/stderr per invocation (1 MB).
const MAX_BUFFER: usize = 1_048_576;

/// Deadline for the login-shell probe; a hanging rc file or slow network
/// home must not stall resolution.
const SHELL_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Install dirs probed when the binary is not on PATH. Tilde-prefixed
/// entries are resolved against the home directory.
const WELL_KNOWN_DIRS: &[&str] = &["/opt/homebrew/bin", "/usr/local/bin", "~/.local/bin", "~/bin"];

pub struct ProcessBridge {
    settings: CliSettings,
    resolved: OnceLock<PathBuf>,
}

impl ProcessBridge {
    pub fn new(settings: CliSettings) -> Self {
        Self {
            settings,
            resolved: OnceLock::new(),
        }
    }

    /// Run the agent CLI with `args`, returning its raw stdout. Fails on a
    /// non-zero exit (carrying trimmed stderr) or when `timeout` elapses,
    /// in which case the child is killed.
    pub async fn run(&self, args: &[String], timeout: Duration) -> Result<Vec<u8>, RelayError> {
        let binary = self.binary_path().await?;
        debug!("running {} {:?}", binary.display(), args);

        let mut cmd = Command::new(&binary);
        cmd.args(args)
            .env("PATH", self.child_path_env(&binary))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if let Some(home) = &self.settings.home_override {
            cmd.env("HOME", home);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| RelayError::ProcessFailed(format!("spawn failed: {e}")))?;

        let stdout_buf = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf = Arc::new(Mutex::new(Vec::new()));
        let stdout_task = child.stdout.take().map(|out| spawn_reader(out, stdout_buf.clone()));
        let stderr_task = child.stderr.take().map(|err| spawn_reader(err, stderr_buf.clone()));

        // Timeout and natural exit race for the same outcome; the timeout
        // branch drops the wait future before killing, so exactly one wins.
        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => {
                status.map_err(|e| RelayError::ProcessFailed(format!("wait failed: {e}")))?
            }
            Err(_) => {
                let _ = child.start_kill();
                return Err(RelayError::Timeout(timeout.as_secs()));
            }
        };

        // Readers stop on EOF once the child is gone.
        if let Some(task) = stdout_task {
            let _ = task.await;
        }
        if let Some(task) = stderr_task {
            let _ = task.await;
        }

        if !status.success() {
            let stderr = stderr_buf.lock().await;
            let msg = String::from_utf8_lossy(&stderr).trim().to_string();
            let msg = if msg.is_empty() {
                format!("exited with {status}")
            } else {
                msg
            };
            return Err(RelayError::ProcessFailed(msg));
        }

        let stdout = stdout_buf.lock().await;
        if stdout.len() >= MAX_BUFFER {
            warn!("stdout capture hit the {MAX_BUFFER} byte cap; reply may be truncated");
        }
        Ok(stdout.clone())
    }

    /// Resolved path to the agent binary, cached after the first search.
    pub async fn binary_path(&self) -> Result<PathBuf, RelayError> {
        if let Some(path) = self.resolved.get() {
            return Ok(path.clone());
        }
        let path = self.resolve().await?;
        info!("agent binary resolved to {}", path.display());
        // A concurrent caller may have won the race; either value is the
        // same search result.
        let _ = self.resolved.set(path.clone());
        Ok(path)
    }

    async fn resolve(&self) -> Result<PathBuf, RelayError> {
        let mut searched = Vec::new();

        if let Some(over) = &self.settings.path_override {
            let path = PathBuf::from(over);
            if is_executable(&path) {
                return Ok(path);
            }
            searched.push(over.clone());
        }

        let name = &self.settings.binary_name;
        for dir in self.candidate_dirs() {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
            searched.push(candidate.to_string_lossy().into_owned());
        }

        // Last resort: an interactive login shell sees the user's full
        // profile-managed PATH even when this process does not.
        if let Some(found) = login_shell_lookup(name).await {
            return Ok(found);
        }
        searched.push(format!("$SHELL -lc 'command -v {name}'"));

        Err(RelayError::ProcessNotFound { searched })
    }

    /// PATH dirs first, then the well-known install dirs, then the home
    /// override's `bin/`.
    fn candidate_dirs(&self) -> Vec<PathBuf> {
        let mut dirs_out: Vec<PathBuf> = Vec::new();
        if let Ok(path) = std::env::var("PATH") {
            dirs_out.extend(path.split(':').filter(|d| !d.is_empty()).map(PathBuf::from));
        }
        for dir in WELL_KNOWN_DIRS {
            if let Some(resolved) = expand_tilde(dir) {
                dirs_out.push(resolved);
            }
        }
        if let Some(home) = &self.settings.home_override {
            dirs_out.push(Path::new(home).join("bin"));
        }
        dirs_out
    }

    /// PATH for the child: the resolved binary's own dir first, then the
    /// inherited PATH, then the well-known dirs. Deduplicated, and dirs
    /// that do not exist are dropped.
    fn child_path_env(&self, binary: &Path) -> String {
        let mut entries: Vec<PathBuf> = Vec::new();
        if let Some(parent) = binary.parent() {
            entries.push(parent.to_path_buf());
        }
        if let Ok(path) = std::env::var("PATH") {
            entries.extend(path.split(':').filter(|d| !d.is_empty()).map(PathBuf::from));
        }
        for dir in WELL_KNOWN_DIRS {
            if let Some(resolved) = expand_tilde(dir) {
                entries.push(resolved);
            }
        }

        let mut seen = Vec::new();
        for entry in entries {
            if entry.is_dir() && !seen.contains(&entry) {
                seen.push(entry);
            }
        }
        seen.iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(":")
    }
}

fn expand_tilde(dir: &str) -> Option<PathBuf> {
    match dir.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|h| h.join(rest)),
        None => Some(PathBuf::from(dir)),
    }
}

/// Ask the user's login shell where the binary lives. Bounded by
/// `SHELL_PROBE_TIMEOUT`; a shell that never answers counts as not found.
async fn login_shell_lookup(name: &str) -> Option<PathBuf> {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    let mut cmd = Command::new(shell);
    cmd.args(["-lc", &format!("command -v {name}")])
        .kill_on_drop(true);
    let output = tokio::time::timeout(SHELL_PROBE_TIMEOUT, cmd.output())
        .await
        .ok()?
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if found.is_empty() {
        return None;
    }
    let path = PathBuf::from(found);
    is_executable(&path).then_some(path)
}

/// Existing regular file with any execute bit set.
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn spawn_reader<R>(mut reader: R, buf: Arc<Mutex<Vec<u8>>>) -> tokio::task::JoinHandle<()>
where
    R: AsyncReadExt + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut tmp = [0u8; 4096];
        loop {
            match reader.read(&mut tmp).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let mut b = buf.lock().await;
                    if b.len() < MAX_BUFFER {
                        let take = n.min(MAX_BUFFER - b.len());
                        b.extend_from_slice(&tmp[..take]);
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "#!/bin/sh\n{body}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn bridge_for(script: &std::path::Path) -> ProcessBridge {
        ProcessBridge::new(CliSettings {
            binary_name: "fake-agent".to_string(),
            path_override: Some(script.to_string_lossy().into_owned()),
            home_override: None,
        })
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fake-agent", "echo '{\"ok\":true}'");
        let bridge = bridge_for(&script);

        let out = bridge.run(&[], Duration::from_secs(5)).await.unwrap();
        assert_eq!(String::from_utf8_lossy(&out).trim(), "{\"ok\":true}");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fake-agent", "echo boom >&2; exit 3");
        let bridge = bridge_for(&script);

        let err = bridge.run(&[], Duration::from_secs(5)).await.unwrap_err();
        match err {
            RelayError::ProcessFailed(msg) => assert_eq!(msg, "boom"),
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_child_is_killed_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fake-agent", "sleep 30");
        let bridge = bridge_for(&script);

        let err = bridge
            .run(&[], Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Timeout(_)));
    }

    #[tokio::test]
    async fn missing_binary_reports_searched_locations() {
        let bridge = ProcessBridge::new(CliSettings {
            binary_name: "sotto-test-binary-that-does-not-exist".to_string(),
            path_override: None,
            home_override: None,
        });

        let err = bridge.binary_path().await.unwrap_err();
        match err {
            RelayError::ProcessNotFound { searched } => {
                assert!(!searched.is_empty());
                assert!(searched
                    .iter()
                    .any(|s| s.contains("sotto-test-binary-that-does-not-exist")));
            }
            other => panic!("expected ProcessNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn home_override_bin_dir_is_searched() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        let script = write_script(&bin, "fake-agent", "echo hi");

        let bridge = ProcessBridge::new(CliSettings {
            binary_name: "fake-agent".to_string(),
            path_override: None,
            home_override: Some(dir.path().to_string_lossy().into_owned()),
        });
        assert_eq!(bridge.binary_path().await.unwrap(), script);
    }

    #[tokio::test]
    async fn hanging_login_shell_does_not_block_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let shell = write_script(dir.path(), "slow-shell", "sleep 30");
        let prev = std::env::var("SHELL").ok();
        std::env::set_var("SHELL", &shell);

        let bridge = ProcessBridge::new(CliSettings {
            binary_name: "sotto-test-hanging-shell-binary".to_string(),
            path_override: None,
            home_override: None,
        });
        let outcome = tokio::time::timeout(Duration::from_secs(10), bridge.binary_path()).await;

        match prev {
            Some(v) => std::env::set_var("SHELL", v),
            None => std::env::remove_var("SHELL"),
        }

        let err = outcome.expect("resolution must not hang").unwrap_err();
        assert!(matches!(err, RelayError::ProcessNotFound { .. }));
    }

    #[tokio::test]
    async fn non_executable_candidate_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        // Right name, no execute bit.
        std::fs::write(bin.join("fake-agent"), "#!/bin/sh\necho hi\n").unwrap();

        let bridge = ProcessBridge::new(CliSettings {
            binary_name: "fake-agent".to_string(),
            path_override: None,
            home_override: Some(dir.path().to_string_lossy().into_owned()),
        });
        let err = bridge.binary_path().await.unwrap_err();
        match err {
            RelayError::ProcessNotFound { searched } => {
                assert!(searched.iter().any(|s| s.ends_with("bin/fake-agent")));
            }
            other => panic!("expected ProcessNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_stdout_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            "fake-agent",
            "head -c 2097152 /dev/zero | tr '\\0' 'a'",
        );
        let bridge = bridge_for(&script);

        let out = bridge.run(&[], Duration::from_secs(10)).await.unwrap();
        assert_eq!(out.len(), MAX_BUFFER);
    }

    #[tokio::test]
    async fn resolution_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fake-agent", "echo hi");
        let bridge = bridge_for(&script);

        let first = bridge.binary_path().await.unwrap();
        std::fs::remove_file(&script).unwrap();
        let second = bridge.binary_path().await.unwrap();
        assert_eq!(first, second);
    }
}
