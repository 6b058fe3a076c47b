//! Concurrent fan-out of the image workflow over a batch
//!
//! Every image is dispatched as its own task tagged with its input index,
//! and completions are written back into a pre-sized result vector by that
//! index. Results therefore follow input order no matter which registry
//! call finishes first, and repeated repository names never collide.

use crate::error::{Error, Result};
use crate::processor::ImageProcessor;
use crate::strategy::PaddingStrategy;
use crate::types::{BatchResult, Digest, ImageReference, PlatformOverrides, RevisionResult};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Runs the [`ImageProcessor`] concurrently across a list of images
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    processor: ImageProcessor,
    max_concurrency: Option<usize>,
}

impl BatchOrchestrator {
    /// Create an orchestrator with unbounded fan-out
    pub fn new(processor: ImageProcessor) -> Self {
        Self {
            processor,
            max_concurrency: None,
        }
    }

    /// Limit the number of images processed at once
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Process every image and return results in input order
    ///
    /// `prior_digests` is matched by position; a missing entry means "no
    /// prior digest". The first fatal error stops aggregation and is
    /// returned. Tasks still in flight are detached rather than aborted, so
    /// tags they publish are kept.
    pub async fn process_batch(
        &self,
        images: &[ImageReference],
        prior_digests: &[Option<Digest>],
        strategy: PaddingStrategy,
        platform: &PlatformOverrides,
    ) -> Result<BatchResult> {
        if prior_digests.len() > images.len() {
            warn!(
                "{} prior digests supplied for {} images, extra entries ignored",
                prior_digests.len(),
                images.len()
            );
        }

        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for (index, image) in images.iter().enumerate() {
            let processor = self.processor.clone();
            let image = image.clone();
            let prior = prior_digests.get(index).cloned().flatten();
            let platform = platform.clone();
            let limiter = limiter.clone();

            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };
                let result = processor
                    .process(&image, prior.as_ref(), strategy, &platform)
                    .await;
                (index, result)
            });
        }

        debug!("Dispatched {} image tasks", images.len());

        let mut slots: Vec<Option<RevisionResult>> = vec![None; images.len()];

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(completed) => completed,
                Err(e) => {
                    tasks.detach_all();
                    return Err(Error::TaskFailed {
                        message: e.to_string(),
                    });
                }
            };

            match result {
                Ok(revision) => {
                    debug!("Image #{} ({}) completed", index, revision.image);
                    slots[index] = Some(revision);
                }
                Err(e) => {
                    warn!("Image #{} failed: {}", index, e);
                    tasks.detach_all();
                    return Err(e);
                }
            }
        }

        let results = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| Error::TaskFailed {
                    message: format!("no result recorded for image #{}", index),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchResult { results })
    }
}
