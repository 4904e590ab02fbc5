//! Build step: runs the plan's compiler, if any

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::models::CaseFailure;
use crate::toolchain::ToolchainPlan;

/// Compile the submission. Interpreted plans succeed without doing anything.
///
/// The compiler gets no stdin. A non-zero exit yields
/// [`CaseFailure::Build`] carrying the compiler's stderr verbatim; any
/// partially written artifact is left for the reclaimer. A compiler still
/// running after `limit` is killed and reported as a build failure.
pub async fn build(plan: &ToolchainPlan, limit: Duration) -> Result<(), CaseFailure> {
    let Some(compile) = &plan.compile else {
        tracing::debug!(language = %plan.language, "No build step for interpreted language");
        return Ok(());
    };

    let start = Instant::now();
    let mut command = compile.command();
    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout(limit, command.output()).await {
        Ok(result) => result.map_err(|e| {
            CaseFailure::Build(format!(
                "Failed to launch {}: {}",
                compile.program_name(),
                e
            ))
        })?,
        Err(_) => {
            tracing::warn!(
                language = %plan.language,
                limit_ms = limit.as_millis() as u64,
                "Compilation timed out"
            );
            return Err(CaseFailure::Build(format!(
                "{} did not finish within {} ms",
                compile.program_name(),
                limit.as_millis()
            )));
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        tracing::warn!(
            language = %plan.language,
            exit_code = output.status.code(),
            elapsed_ms,
            "Compilation failed"
        );

        // Some toolchains report diagnostics on stdout
        let diagnostics = if !stderr.trim().is_empty() {
            stderr
        } else if !stdout.trim().is_empty() {
            stdout
        } else {
            match output.status.code() {
                Some(code) => format!("{} exited with code {}", compile.program_name(), code),
                None => format!("{} was terminated by a signal", compile.program_name()),
            }
        };

        return Err(CaseFailure::Build(diagnostics));
    }

    tracing::debug!(language = %plan.language, elapsed_ms, "Compilation succeeded");
    Ok(())
}
