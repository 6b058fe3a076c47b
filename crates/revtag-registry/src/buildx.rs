//! Tag creation through `docker buildx imagetools create`

use crate::command::{command_line, run_tool};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use revtag_core::TagPublisher;
use std::path::PathBuf;
use tracing::{debug, info};

/// Publishes tags by creating a new manifest reference with buildx
///
/// `imagetools create` copies the source manifest (or manifest list) to
/// the new tag inside the registry; no image data is pulled.
#[derive(Debug, Clone)]
pub struct BuildxPublisher {
    binary: PathBuf,
}

impl BuildxPublisher {
    /// Locate `docker` in PATH
    ///
    /// # Errors
    /// Returns an error if docker is not found in PATH
    pub fn new() -> Result<Self> {
        let binary = which::which("docker")
            .context("docker not found in PATH. Install from: https://docs.docker.com/get-docker/")?;

        debug!("Found docker at: {:?}", binary);

        Ok(Self { binary })
    }

    /// Use an explicit docker binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for `docker buildx imagetools create`
    pub fn create_args(repository: &str, source_version: &str, new_tag: &str) -> Vec<String> {
        vec![
            "buildx".to_string(),
            "imagetools".to_string(),
            "create".to_string(),
            format!("{}:{}", repository, source_version),
            "--tag".to_string(),
            format!("{}:{}", repository, new_tag),
        ]
    }

    /// Full command line of a tag creation, for diagnostics
    pub fn create_command(&self, repository: &str, source_version: &str, new_tag: &str) -> String {
        command_line(
            &self.binary,
            &Self::create_args(repository, source_version, new_tag),
        )
    }
}

#[async_trait]
impl TagPublisher for BuildxPublisher {
    async fn publish_tag(
        &self,
        repository: &str,
        source_version: &str,
        new_tag: &str,
    ) -> Result<()> {
        let args = Self::create_args(repository, source_version, new_tag);
        let output = run_tool(&self.binary, &args).await?;

        if !output.success {
            return Err(anyhow!(
                "docker buildx imagetools create failed ({}): {}",
                output.status(),
                output.stderr.trim()
            ));
        }

        info!("Created {}:{}", repository, new_tag);
        Ok(())
    }
}
