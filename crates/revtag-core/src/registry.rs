//! Traits for the registry operations the engine depends on.
//!
//! The engine never talks to a registry itself. Implementors live in
//! revtag-registry (or tests can provide a mock).

use crate::types::{Digest, ImageReference, PlatformOverrides};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves the current content digest of an image
#[async_trait]
pub trait DigestInspector: Send + Sync {
    /// Inspect `image`, honouring any platform overrides
    ///
    /// Returns `Ok(None)` when the registry has no such image.
    async fn inspect_digest(
        &self,
        image: &ImageReference,
        platform: &PlatformOverrides,
    ) -> Result<Option<Digest>>;
}

/// Lists the tags of a repository
#[async_trait]
pub trait TagLister: Send + Sync {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>>;
}

/// Creates a new tag in a repository
#[async_trait]
pub trait TagPublisher: Send + Sync {
    /// Create `repository:new_tag` from `repository:source_version`
    async fn publish_tag(&self, repository: &str, source_version: &str, new_tag: &str)
        -> Result<()>;
}

/// Shared handles to the three registry collaborators
#[derive(Clone)]
pub struct Registry {
    pub inspector: Arc<dyn DigestInspector>,
    pub lister: Arc<dyn TagLister>,
    pub publisher: Arc<dyn TagPublisher>,
}

impl Registry {
    pub fn new(
        inspector: Arc<dyn DigestInspector>,
        lister: Arc<dyn TagLister>,
        publisher: Arc<dyn TagPublisher>,
    ) -> Self {
        Self {
            inspector,
            lister,
            publisher,
        }
    }

    /// Use one value for all three roles
    pub fn from_shared<T>(registry: Arc<T>) -> Self
    where
        T: DigestInspector + TagLister + TagPublisher + 'static,
    {
        Self {
            inspector: registry.clone(),
            lister: registry.clone(),
            publisher: registry,
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}
