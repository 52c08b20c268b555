use crate::error::{AuditError, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Run an engine's CLI and return its stdout.
///
/// `ok_codes` lists the exit codes that still carry a usable report (pa11y
/// exits with 2 when it found issues). The child is killed if `timeout`
/// elapses first.
pub async fn run_engine(
    engine: &str,
    program: &str,
    args: &[String],
    ok_codes: &[i32],
    timeout: Duration,
) -> Result<String> {
    debug!(engine, program, ?args, "Spawning check engine");
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| checker_error(engine, format!("failed to start '{}': {}", program, e)))?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| checker_error(engine, format!("no result after {}s", timeout.as_secs())))??;

    let code = output.status.code().unwrap_or(-1);
    if !ok_codes.contains(&code) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(checker_error(engine, format!("exited with status {}: {}", code, stderr.trim())));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub fn checker_error(engine: &str, message: impl Into<String>) -> AuditError {
    AuditError::Checker {
        engine: engine.to_string(),
        message: message.into(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_stdout_for_accepted_exit_codes() {
        let args = vec!["-c".to_string(), "echo '[]'; exit 2".to_string()];
        let out = run_engine("pa11y", "sh", &args, &[0, 2], Duration::from_secs(5)).await.unwrap();
        assert_eq!(out.trim(), "[]");
    }

    #[tokio::test]
    async fn unexpected_exit_code_is_a_checker_error() {
        let args = vec!["-c".to_string(), "echo broken >&2; exit 1".to_string()];
        let err = run_engine("axe", "sh", &args, &[0], Duration::from_secs(5)).await.unwrap_err();
        match err {
            AuditError::Checker { engine, message } => {
                assert_eq!(engine, "axe");
                assert!(message.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_a_checker_error() {
        let err = run_engine("axe", "/nonexistent/axe", &[], &[0], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Checker { .. }));
    }

    #[tokio::test]
    async fn slow_engine_times_out() {
        let args = vec!["-c".to_string(), "sleep 5".to_string()];
        let err = run_engine("axe", "sh", &args, &[0], Duration::from_millis(100)).await.unwrap_err();
        assert!(err.to_string().contains("no result"));
    }
}
