use async_trait::async_trait;
use flum_core::{CommandRunner, CommandSpec, ExecutionResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

// PowerShell when the flag asks for it, the platform shell otherwise.
fn interpreter_for(spec: &CommandSpec) -> Command {
    let mut cmd = if spec.is_powershell {
        let mut c = Command::new(if cfg!(windows) { "powershell" } else { "pwsh" });
        c.arg("-Command").arg(&spec.command);
        c
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&spec.command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&spec.command);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

#[async_trait]
impl CommandRunner for ShellRunner {
    // Spawn failures and timeouts come back as synthetic failed results;
    // nothing propagates past this boundary. Retries are decided one level
    // up by the self-correction loop.
    async fn run(&self, spec: &CommandSpec, limit: Duration) -> ExecutionResult {
        info!(command = %spec.command, powershell = spec.is_powershell, "executing command");

        let mut cmd = interpreter_for(spec);
        match timeout(limit, cmd.output()).await {
            Ok(Ok(output)) => {
                let result = ExecutionResult {
                    exit_code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };
                debug!(exit_code = result.exit_code, "command finished");
                result
            }
            Ok(Err(err)) => {
                ExecutionResult::synthetic_failure(format!("failed to spawn command: {err}"))
            }
            Err(_) => ExecutionResult::synthetic_failure(format!(
                "command timed out after {} seconds",
                limit.as_secs()
            )),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn spec(command: &str) -> CommandSpec {
        CommandSpec::new(command, "test command")
    }

    #[tokio::test]
    async fn captures_stdout_on_success() {
        let runner = ShellRunner::new();
        let result = runner.run(&spec("echo hello"), Duration::from_secs(5)).await;
        assert!(result.succeeded());
        assert_eq!(result.combined_output(), "hello");
    }

    #[tokio::test]
    async fn reports_nonzero_exit_code() {
        let runner = ShellRunner::new();
        let result = runner
            .run(&spec("echo oops >&2; exit 3"), Duration::from_secs(5))
            .await;
        assert!(!result.succeeded());
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn unknown_command_is_a_result_not_an_error() {
        let runner = ShellRunner::new();
        let result = runner
            .run(&spec("definitely-not-a-real-binary-2718"), Duration::from_secs(5))
            .await;
        assert!(!result.succeeded());
    }

    #[tokio::test]
    async fn timeout_yields_synthetic_failure() {
        let runner = ShellRunner::new();
        let result = runner.run(&spec("sleep 5"), Duration::from_millis(100)).await;
        assert!(!result.succeeded());
        assert!(result.stderr.contains("timed out"));
    }
}
