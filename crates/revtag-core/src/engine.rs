//! Entry point tying a validated configuration to the registry collaborators

use crate::batch::BatchOrchestrator;
use crate::config::{ImageTarget, RevisionConfig};
use crate::error::Result;
use crate::processor::ImageProcessor;
use crate::registry::Registry;
use crate::types::{BatchResult, RevisionResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Structured result of one engine invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "result", rename_all = "snake_case")]
pub enum EngineOutput {
    Single(RevisionResult),
    Batch(BatchResult),
}

impl EngineOutput {
    /// Number of revision tags published
    pub fn published(&self) -> usize {
        match self {
            Self::Single(result) => usize::from(result.changed()),
            Self::Batch(batch) => batch.results.iter().filter(|r| r.changed()).count(),
        }
    }
}

/// Runs single-image or batch invocations
#[derive(Debug, Clone)]
pub struct RevisionEngine {
    registry: Registry,
}

impl RevisionEngine {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub async fn run(&self, config: &RevisionConfig) -> Result<EngineOutput> {
        let processor = ImageProcessor::new(self.registry.clone());

        let output = match &config.target {
            ImageTarget::Single {
                image,
                prior_digest,
            } => {
                let result = processor
                    .process(
                        image,
                        prior_digest.as_ref(),
                        config.strategy,
                        &config.platform,
                    )
                    .await?;
                EngineOutput::Single(result)
            }
            ImageTarget::Batch {
                images,
                prior_digests,
            } => {
                let batch = BatchOrchestrator::new(processor)
                    .with_max_concurrency(config.max_concurrency)
                    .process_batch(images, prior_digests, config.strategy, &config.platform)
                    .await?;
                EngineOutput::Batch(batch)
            }
        };

        info!(
            "Processed {} image(s), published {} revision tag(s)",
            config.target.len(),
            output.published()
        );

        Ok(output)
    }
}
