//! Running external registry tools

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, trace, warn};

/// Captured result of a tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl ToolOutput {
    /// Exit code for messages, "signal" when killed
    pub fn status(&self) -> String {
        self.code
            .map(|c| format!("exit code {}", c))
            .unwrap_or_else(|| "terminated by signal".to_string())
    }
}

/// Render an argv for logs
pub fn command_line(binary: &Path, args: &[String]) -> String {
    let mut line = binary.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Run `binary` with `args` and capture its output
///
/// A non-zero exit is not an error here; callers decide what it means.
pub async fn run_tool(binary: &Path, args: &[String]) -> Result<ToolOutput> {
    let line = command_line(binary, args);
    debug!("Running: {}", line);

    let output = Command::new(binary)
        .args(args)
        .output()
        .await
        .with_context(|| format!("Failed to execute {}", line))?;

    let output = ToolOutput::from(output);
    trace!("{} stdout: {}", line, output.stdout.trim());

    if !output.success {
        warn!(
            "Command failed ({}): {}\nStderr: {}",
            output.status(),
            line,
            output.stderr.trim()
        );
    }

    Ok(output)
}
