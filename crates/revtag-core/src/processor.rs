//! Per-image workflow: inspect, compare, list tags, compute, publish.

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::revision::next_revision;
use crate::strategy::PaddingStrategy;
use crate::types::{Digest, ImageReference, PlatformOverrides, RevisionResult};
use tracing::{debug, info};

/// Runs the revision workflow for one image at a time
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    registry: Registry,
}

impl ImageProcessor {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Process a single image
    ///
    /// Performs no registry mutation when the current digest equals
    /// `prior_digest`, and exactly one tag creation otherwise.
    pub async fn process(
        &self,
        image: &ImageReference,
        prior_digest: Option<&Digest>,
        strategy: PaddingStrategy,
        platform: &PlatformOverrides,
    ) -> Result<RevisionResult> {
        debug!("Inspecting {} (platform {})", image, platform);

        let new_digest = self
            .registry
            .inspector
            .inspect_digest(image, platform)
            .await
            .map_err(|e| Error::inspect_failed(image.to_string(), format!("{:#}", e)))?
            .filter(|digest| !digest.as_str().is_empty())
            .ok_or_else(|| Error::digest_not_found(image.to_string()))?;

        if prior_digest == Some(&new_digest) {
            info!("{} unchanged at {}", image, new_digest);
            return Ok(RevisionResult {
                image: image.clone(),
                prior_digest: prior_digest.cloned(),
                new_digest,
                revision_tag: None,
            });
        }

        match prior_digest {
            Some(prior) => info!("{} changed: {} -> {}", image, prior, new_digest),
            None => info!("{} has no prior digest, current is {}", image, new_digest),
        }

        let tags = self
            .registry
            .lister
            .list_tags(&image.repository)
            .await
            .map_err(|e| Error::list_failed(image.to_string(), format!("{:#}", e)))?;

        debug!("Found {} tags for {}", tags.len(), image.repository);

        let revision = next_revision(&tags, &image.version, strategy).map_err(|e| match e {
            Error::NoVersionTag { .. } => Error::no_version_tag(image.to_string()),
            other => other,
        })?;

        self.registry
            .publisher
            .publish_tag(&image.repository, &image.version, &revision)
            .await
            .map_err(|e| {
                Error::publish_failed(image.to_string(), revision.clone(), format!("{:#}", e))
            })?;

        info!("Tagged {} as {}:{}", image, image.repository, revision);

        Ok(RevisionResult {
            image: image.clone(),
            prior_digest: prior_digest.cloned(),
            new_digest,
            revision_tag: Some(revision),
        })
    }
}
