//! Digest inspection and tag listing through `skopeo`

use crate::command::{command_line, run_tool};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use revtag_core::{Digest, DigestInspector, ImageReference, PlatformOverrides, TagLister};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, trace, warn};

/// Stderr fragments skopeo prints when the image or repository does not exist
const NOT_FOUND_MARKERS: &[&str] = &["manifest unknown", "name unknown"];

/// Talks to remote registries through the `skopeo` CLI
#[derive(Debug, Clone)]
pub struct SkopeoClient {
    binary: PathBuf,
}

impl SkopeoClient {
    /// Locate `skopeo` in PATH
    ///
    /// # Errors
    /// Returns an error if skopeo is not found in PATH
    pub fn new() -> Result<Self> {
        let binary = which::which("skopeo").context(
            "skopeo not found in PATH. Install from: https://github.com/containers/skopeo/blob/main/install.md",
        )?;

        debug!("Found skopeo at: {:?}", binary);

        Ok(Self { binary })
    }

    /// Use an explicit skopeo binary
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for `skopeo inspect`
    ///
    /// Platform overrides are global options and precede the subcommand.
    pub fn inspect_args(image: &ImageReference, platform: &PlatformOverrides) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(os) = &platform.os {
            args.push(format!("--override-os={}", os));
        }
        if let Some(arch) = &platform.architecture {
            args.push(format!("--override-arch={}", arch));
        }
        if let Some(variant) = &platform.variant {
            args.push(format!("--override-variant={}", variant));
        }

        args.push("inspect".to_string());
        args.push("--format".to_string());
        args.push("{{.Digest}}".to_string());
        args.push(format!("docker://{}", image));
        args
    }

    /// Arguments for `skopeo list-tags`
    pub fn list_tags_args(repository: &str) -> Vec<String> {
        vec![
            "list-tags".to_string(),
            format!("docker://{}", repository),
        ]
    }

    /// Full command line of an inspection, for diagnostics
    pub fn inspect_command(&self, image: &ImageReference, platform: &PlatformOverrides) -> String {
        command_line(&self.binary, &Self::inspect_args(image, platform))
    }
}

#[async_trait]
impl DigestInspector for SkopeoClient {
    async fn inspect_digest(
        &self,
        image: &ImageReference,
        platform: &PlatformOverrides,
    ) -> Result<Option<Digest>> {
        let output = run_tool(&self.binary, &Self::inspect_args(image, platform)).await?;

        if output.success {
            trace!("skopeo inspect {}: {}", image, output.stdout.trim());
            return Ok(Digest::parse_optional(&output.stdout));
        }

        if is_not_found(&output.stderr) {
            warn!("Image not found in registry: {}", image);
            return Ok(None);
        }

        Err(anyhow!(
            "skopeo inspect failed ({}): {}",
            output.status(),
            output.stderr.trim()
        ))
    }
}

#[async_trait]
impl TagLister for SkopeoClient {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        let output = run_tool(&self.binary, &Self::list_tags_args(repository)).await?;

        if !output.success {
            return Err(anyhow!(
                "skopeo list-tags failed ({}): {}",
                output.status(),
                output.stderr.trim()
            ));
        }

        let tags = parse_list_tags(&output.stdout)
            .with_context(|| format!("Failed to parse tag list for {}", repository))?;

        debug!("Found {} tags for {}", tags.len(), repository);
        Ok(tags)
    }
}

/// Output of `skopeo list-tags`
#[derive(Debug, Deserialize)]
struct ListTagsResponse {
    #[serde(rename = "Tags", default)]
    tags: Vec<String>,
}

/// Parse the JSON printed by `skopeo list-tags`
pub fn parse_list_tags(stdout: &str) -> Result<Vec<String>> {
    let response: ListTagsResponse = serde_json::from_str(stdout.trim())?;
    Ok(response.tags)
}

fn is_not_found(stderr: &str) -> bool {
    let stderr = stderr.to_lowercase();
    NOT_FOUND_MARKERS.iter().any(|marker| stderr.contains(marker))
}
