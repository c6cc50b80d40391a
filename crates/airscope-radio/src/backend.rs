//! Bounded invocation of external scan and mode tools.
//!
//! The rest of the crate never inspects process internals: a backend is
//! `run_backend(name, program, args, timeout) -> Result<stdout, _>` —
//! exit code and captured stdout only. A backend that exceeds its bound
//! is killed, not left running.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::RadioError;

/// Run an external tool, capture its stdout, and enforce a deadline.
///
/// `backend` names the mechanism for error reporting (`"nmcli"`,
/// `"airmon-ng"`, …). Failure modes collapse to two variants: the tool
/// missed the deadline ([`RadioError::BackendTimeout`]) or it could not
/// run / exited non-zero ([`RadioError::BackendFailed`]).
pub async fn run_backend(
    backend: &'static str,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, RadioError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RadioError::BackendFailed {
            backend,
            reason: format!("failed to spawn {program}: {e}"),
        })?;

    // On timeout the wait future (which owns the child) is dropped and
    // kill_on_drop reaps the process.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| RadioError::BackendFailed {
            backend,
            reason: e.to_string(),
        })?,
        Err(_) => {
            return Err(RadioError::BackendTimeout {
                backend,
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RadioError::BackendFailed {
            backend,
            reason: format!("{program} exited with {}: {}", output.status, stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let out = run_backend("echo", "echo", &["hello", "radio"], TIMEOUT)
            .await
            .expect("echo should succeed");
        assert_eq!(out.trim(), "hello radio");
    }

    #[tokio::test]
    async fn nonzero_exit_is_backend_failed() {
        let err = run_backend("sh", "sh", &["-c", "echo oops >&2; exit 3"], TIMEOUT)
            .await
            .expect_err("non-zero exit must fail");
        match err {
            RadioError::BackendFailed { backend, reason } => {
                assert_eq!(backend, "sh");
                assert!(reason.contains("oops"), "stderr should be captured: {reason}");
            }
            other => panic!("expected BackendFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_backend_failed() {
        let err = run_backend("ghost", "airscope-no-such-tool", &[], TIMEOUT)
            .await
            .expect_err("missing binary must fail");
        assert!(matches!(err, RadioError::BackendFailed { .. }));
        assert!(err.is_backend());
    }

    #[tokio::test]
    async fn deadline_overrun_is_backend_timeout() {
        let err = run_backend(
            "sleep",
            "sh",
            &["-c", "sleep 5"],
            Duration::from_millis(50),
        )
        .await
        .expect_err("sleep must overrun the deadline");
        match err {
            RadioError::BackendTimeout { backend, .. } => assert_eq!(backend, "sleep"),
            other => panic!("expected BackendTimeout, got {other:?}"),
        }
    }
}
