//! Execution step: runs the program against one case under a time budget
//!
//! Stdin is bound to the case input file and stdout to a fresh output file.
//! Stderr is captured for diagnostics. The child runs in its own process
//! group so that a timeout kills everything it spawned, not just the
//! immediate child.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::time::timeout;

use crate::models::CaseFailure;
use crate::toolchain::Invocation;

/// How long to keep draining stderr after the child has exited. A grandchild
/// that inherited the pipe could otherwise hold it open indefinitely.
const STDERR_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Successful execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// Whatever the program wrote to stderr (programs may warn and still pass)
    pub stderr: String,
}

/// Run `run` once with `input_path` as stdin, writing stdout to `output_path`
pub async fn execute(
    run: &Invocation,
    input_path: &Path,
    output_path: &Path,
    budget: Duration,
) -> Result<ExecutionOutput, CaseFailure> {
    let stdin = std::fs::File::open(input_path).map_err(|e| {
        CaseFailure::Runtime(format!(
            "Failed to open input {}: {}",
            input_path.display(),
            e
        ))
    })?;
    let stdout = std::fs::File::create(output_path).map_err(|e| {
        CaseFailure::Runtime(format!(
            "Failed to create output {}: {}",
            output_path.display(),
            e
        ))
    })?;

    let mut command = run.command();
    command
        .stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    {
        command.process_group(0);
    }

    let mut child = command.spawn().map_err(|e| {
        CaseFailure::Runtime(format!("Failed to launch {}: {}", run.program_name(), e))
    })?;

    let stderr_pipe = child.stderr.take();
    let mut stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stderr_pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    });

    match timeout(budget, child.wait()).await {
        Ok(Ok(status)) => {
            let stderr = match timeout(STDERR_DRAIN_GRACE, &mut stderr_task).await {
                Ok(joined) => joined.unwrap_or_default(),
                Err(_) => {
                    stderr_task.abort();
                    String::new()
                }
            };

            if status.success() {
                Ok(ExecutionOutput { stderr })
            } else {
                tracing::debug!(exit_code = status.code(), "Program exited with failure");
                Err(CaseFailure::Runtime(describe_failure(status, stderr)))
            }
        }
        Ok(Err(e)) => {
            stderr_task.abort();
            Err(CaseFailure::Runtime(format!("Failed to wait for process: {}", e)))
        }
        Err(_) => {
            terminate(&mut child).await;
            stderr_task.abort();
            tracing::warn!(budget_ms = budget.as_millis() as u64, "Execution timed out");
            Err(CaseFailure::Timeout(budget))
        }
    }
}

/// Kill the child's process group and reap the child
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                tracing::debug!(pid, error = %e, "Failed to signal process group");
            }
        }
    }

    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "Failed to kill timed out process");
    }
}

/// Stderr verbatim when there is any, otherwise the exit code or signal
fn describe_failure(status: ExitStatus, stderr: String) -> String {
    if !stderr.trim().is_empty() {
        return stderr;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Killed by signal {}", signal);
        }
    }

    match status.code() {
        Some(code) => format!("Process exited with code {}", code),
        None => "Process terminated abnormally".to_string(),
    }
}
