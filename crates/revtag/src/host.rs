//! GitHub Actions host boundary
//!
//! Named outputs are appended to the file named by `$GITHUB_OUTPUT`, and
//! log grouping and error annotations use the `::command::` syntax the
//! runner understands. Outside a runner both fall back to plain terminal
//! output.

use crate::output;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use revtag_core::EngineOutput;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

const DELIMITER: &str = "REVTAG_EOF";

/// Where outputs, groups and annotations go
#[derive(Debug, Clone, Default)]
pub struct ActionsHost {
    output_file: Option<Utf8PathBuf>,
    annotations: bool,
}

impl ActionsHost {
    pub fn new(output_file: Option<Utf8PathBuf>, annotations: bool) -> Self {
        Self {
            output_file,
            annotations,
        }
    }

    /// Detect the runner from `GITHUB_OUTPUT` and `GITHUB_ACTIONS`
    pub fn from_env() -> Self {
        let output_file = std::env::var("GITHUB_OUTPUT")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(Utf8PathBuf::from);
        let annotations = std::env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true");

        Self::new(output_file, annotations)
    }

    pub fn is_actions(&self) -> bool {
        self.annotations
    }

    /// Publish a named output
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let entry = format_output(name, value);

        match &self.output_file {
            Some(path) => {
                debug!("Writing output '{}' to {}", name, path);
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open output file {}", path))?;
                file.write_all(entry.as_bytes())
                    .with_context(|| format!("Failed to write output '{}' to {}", name, path))?;
            }
            None => print!("{}", entry),
        }

        Ok(())
    }

    /// Write the named outputs for an engine result
    ///
    /// Single mode sets `digest` and, when a tag was published, `revision`.
    /// Batch mode sets `digests` and `revisions` as JSON arrays aligned
    /// with the input images.
    pub fn write_outputs(&self, result: &EngineOutput) -> Result<()> {
        match result {
            EngineOutput::Single(result) => {
                self.set_output("digest", result.new_digest.as_str())?;
                if let Some(revision) = &result.revision_tag {
                    self.set_output("revision", revision)?;
                }
            }
            EngineOutput::Batch(batch) => {
                let digests = serde_json::to_string(&batch.digests())?;
                let revisions = serde_json::to_string(&batch.revisions())?;
                self.set_output("digests", &digests)?;
                self.set_output("revisions", &revisions)?;
            }
        }

        Ok(())
    }

    /// Open a collapsible log group, closed when the guard drops
    pub fn group(&self, title: &str) -> LogGroup {
        if self.annotations {
            println!("::group::{}", escape_data(title));
        } else {
            output::header(title);
        }

        LogGroup {
            annotations: self.annotations,
        }
    }

    /// Report a failure
    pub fn error(&self, msg: &str) {
        if self.annotations {
            println!("::error::{}", escape_data(msg));
        } else {
            output::error(msg);
        }
    }
}

/// Guard for an open log group
#[must_use = "the group closes when this guard is dropped"]
pub struct LogGroup {
    annotations: bool,
}

impl Drop for LogGroup {
    fn drop(&mut self) {
        if self.annotations {
            println!("::endgroup::");
        }
    }
}

/// Render one output entry in the `$GITHUB_OUTPUT` file format
fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let mut delimiter = DELIMITER.to_string();
    while value.contains(&delimiter) {
        delimiter.push('_');
    }

    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Escape a workflow command payload
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
