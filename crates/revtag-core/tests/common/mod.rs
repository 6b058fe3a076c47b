//! Common test infrastructure for revtag-core tests
//!
//! Provides an in-memory registry implementing all three collaborator
//! traits, recording every call so tests can assert which registry
//! operations were (or were not) issued.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use revtag_core::{
    Digest, DigestInspector, ImageReference, PlatformOverrides, Registry, TagLister, TagPublisher,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DIGEST: &str = "sha256:42";
pub const UPDATED_DIGEST: &str = "sha256:43";

/// A registry call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Inspect {
        image: String,
        platform: PlatformOverrides,
    },
    ListTags {
        repository: String,
    },
    Publish {
        repository: String,
        source_version: String,
        new_tag: String,
    },
}

/// In-memory registry
#[derive(Default)]
pub struct MockRegistry {
    digests: Mutex<HashMap<String, String>>,
    tags: Mutex<HashMap<String, Vec<String>>>,
    delays: Mutex<HashMap<String, Duration>>,
    failing_inspect: Mutex<HashSet<String>>,
    failing_list: Mutex<HashSet<String>>,
    failing_publish: Mutex<HashSet<String>>,
    calls: Mutex<Vec<Call>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `digest` when `image` is inspected
    pub fn with_digest(self, image: &str, digest: &str) -> Self {
        self.digests
            .lock()
            .unwrap()
            .insert(image.to_string(), digest.to_string());
        self
    }

    /// Existing tags of `repository`
    pub fn with_tags(self, repository: &str, tags: &[&str]) -> Self {
        self.tags.lock().unwrap().insert(
            repository.to_string(),
            tags.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Delay inspection of `image` before answering
    pub fn with_delay(self, image: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(image.to_string(), delay);
        self
    }

    pub fn failing_inspect(self, image: &str) -> Self {
        self.failing_inspect
            .lock()
            .unwrap()
            .insert(image.to_string());
        self
    }

    pub fn failing_list(self, repository: &str) -> Self {
        self.failing_list
            .lock()
            .unwrap()
            .insert(repository.to_string());
        self
    }

    pub fn failing_publish(self, repository: &str) -> Self {
        self.failing_publish
            .lock()
            .unwrap()
            .insert(repository.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListTags { .. }))
            .count()
    }

    pub fn published(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Publish {
                    repository,
                    new_tag,
                    ..
                } => Some(format!("{}:{}", repository, new_tag)),
                _ => None,
            })
            .collect()
    }

    /// Order in which inspections completed
    pub fn inspected(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Inspect { image, .. } => Some(image),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DigestInspector for MockRegistry {
    async fn inspect_digest(
        &self,
        image: &ImageReference,
        platform: &PlatformOverrides,
    ) -> Result<Option<Digest>> {
        let key = image.to_string();
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(Call::Inspect {
            image: key.clone(),
            platform: platform.clone(),
        });

        if self.failing_inspect.lock().unwrap().contains(&key) {
            return Err(anyhow!("connection refused"));
        }

        Ok(self.digests.lock().unwrap().get(&key).map(|d| Digest::new(d.as_str())))
    }
}

#[async_trait]
impl TagLister for MockRegistry {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        self.record(Call::ListTags {
            repository: repository.to_string(),
        });

        if self.failing_list.lock().unwrap().contains(repository) {
            return Err(anyhow!("registry returned 500"));
        }

        Ok(self
            .tags
            .lock()
            .unwrap()
            .get(repository)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl TagPublisher for MockRegistry {
    async fn publish_tag(
        &self,
        repository: &str,
        source_version: &str,
        new_tag: &str,
    ) -> Result<()> {
        self.record(Call::Publish {
            repository: repository.to_string(),
            source_version: source_version.to_string(),
            new_tag: new_tag.to_string(),
        });

        if self.failing_publish.lock().unwrap().contains(repository) {
            return Err(anyhow!("denied: requested access to the resource is denied"));
        }

        self.tags
            .lock()
            .unwrap()
            .entry(repository.to_string())
            .or_default()
            .push(new_tag.to_string());
        Ok(())
    }
}

/// Wrap a mock into engine registry handles, keeping a handle for assertions
pub fn registry(mock: MockRegistry) -> (Arc<MockRegistry>, Registry) {
    let mock = Arc::new(mock);
    let registry = Registry::from_shared(mock.clone());
    (mock, registry)
}

pub fn image(s: &str) -> ImageReference {
    ImageReference::parse(s).unwrap()
}

pub fn digest(s: &str) -> Digest {
    Digest::new(s)
}
