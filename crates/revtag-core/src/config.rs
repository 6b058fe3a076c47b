//! Engine configuration
//!
//! [`RevisionInputs`] is the raw, string-typed form filled in by the host
//! (command-line flags, `INPUT_*` variables, or a YAML file).
//! [`RevisionInputs::into_config`] validates it into a [`RevisionConfig`],
//! so malformed image references and strategy descriptors are rejected
//! before any registry call is made.

use crate::error::{Error, Result};
use crate::strategy::PaddingStrategy;
use crate::types::{Digest, ImageReference, PlatformOverrides};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, warn};

/// A list-valued input
///
/// Text form accepts a JSON array (entries may be `null`) or newline/comma
/// separated values. YAML files may use a plain sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<Option<String>>),
    Text(String),
}

impl ListInput {
    /// Split into positional entries, blank entries becoming `None`
    pub fn entries(&self) -> Result<Vec<Option<String>>> {
        match self {
            Self::Items(items) => Ok(items.iter().map(|i| non_blank(i.as_deref())).collect()),
            Self::Text(text) => parse_list(text),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Items(items) => items.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<&str> for ListInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Parse a textual list input
pub fn parse_list(text: &str) -> Result<Vec<Option<String>>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    if text.starts_with('[') {
        let items: Vec<Option<String>> = serde_json::from_str(text)?;
        return Ok(items.iter().map(|i| non_blank(i.as_deref())).collect());
    }

    Ok(text
        .split(['\n', ','])
        .map(|entry| non_blank(Some(entry)))
        .collect())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Raw named inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevisionInputs {
    /// Single image, `repository:version`
    pub image: Option<String>,
    /// Previously recorded digest for `image`
    pub digest: Option<String>,
    /// Batch of images; takes precedence over `image`
    pub images: Option<ListInput>,
    /// Previously recorded digests, aligned with `images`
    pub digests: Option<ListInput>,
    /// Padding strategy descriptor
    pub strategy: Option<String>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub variant: Option<String>,
    /// Upper bound on images processed at once
    pub max_concurrency: Option<usize>,
}

impl RevisionInputs {
    /// Load inputs from a YAML file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        let inputs: Self = serde_yaml_ng::from_str(&content)?;
        debug!("Loaded inputs from {}", path);
        Ok(inputs)
    }

    /// Overlay `other` on top of `self`, field by field
    ///
    /// Blank strings in `other` do not replace values in `self`.
    pub fn merge(self, other: RevisionInputs) -> RevisionInputs {
        fn pick(base: Option<String>, over: Option<String>) -> Option<String> {
            match over {
                Some(v) if !v.trim().is_empty() => Some(v),
                _ => base,
            }
        }

        fn pick_list(base: Option<ListInput>, over: Option<ListInput>) -> Option<ListInput> {
            match over {
                Some(v) if !v.is_blank() => Some(v),
                _ => base,
            }
        }

        RevisionInputs {
            image: pick(self.image, other.image),
            digest: pick(self.digest, other.digest),
            images: pick_list(self.images, other.images),
            digests: pick_list(self.digests, other.digests),
            strategy: pick(self.strategy, other.strategy),
            os: pick(self.os, other.os),
            arch: pick(self.arch, other.arch),
            variant: pick(self.variant, other.variant),
            max_concurrency: other.max_concurrency.or(self.max_concurrency),
        }
    }

    /// Validate into a runnable configuration
    pub fn into_config(self) -> Result<RevisionConfig> {
        let strategy = PaddingStrategy::parse(self.strategy.as_deref().unwrap_or(""))?;

        let platform = PlatformOverrides::new(
            self.os.as_deref(),
            self.arch.as_deref(),
            self.variant.as_deref(),
        );

        if self.max_concurrency == Some(0) {
            return Err(Error::invalid_config("max_concurrency must be at least 1"));
        }

        let images = match &self.images {
            Some(list) if !list.is_blank() => Some(list.entries()?),
            _ => None,
        };

        let target = if let Some(entries) = images {
            if non_blank(self.image.as_deref()).is_some() {
                warn!("Both 'image' and 'images' were provided; using 'images'");
            }

            let digest_entries = match &self.digests {
                Some(list) => list.entries()?,
                None => Vec::new(),
            };
            if digest_entries.len() > entries.len() {
                warn!(
                    "{} digests provided for {} image entries; ignoring the extras",
                    digest_entries.len(),
                    entries.len()
                );
            }

            // A blank image entry drops its digest position too, so each
            // prior digest stays paired with the image it was recorded for.
            let mut images = Vec::with_capacity(entries.len());
            let mut prior_digests = Vec::with_capacity(entries.len());
            for (index, entry) in entries.into_iter().enumerate() {
                let Some(image) = entry else {
                    continue;
                };
                images.push(ImageReference::parse(&image)?);
                if let Some(digest) = digest_entries.get(index) {
                    prior_digests.push(digest.as_deref().and_then(Digest::parse_optional));
                }
            }

            if images.is_empty() {
                return Err(Error::invalid_config("'images' contains no image references"));
            }

            ImageTarget::Batch {
                images,
                prior_digests,
            }
        } else if let Some(image) = non_blank(self.image.as_deref()) {
            ImageTarget::Single {
                image: ImageReference::parse(&image)?,
                prior_digest: self.digest.as_deref().and_then(Digest::parse_optional),
            }
        } else {
            return Err(Error::invalid_config(
                "either 'image' or 'images' must be provided",
            ));
        };

        Ok(RevisionConfig {
            target,
            strategy,
            platform,
            max_concurrency: self.max_concurrency,
        })
    }
}

/// Which images an invocation covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ImageTarget {
    Single {
        image: ImageReference,
        prior_digest: Option<Digest>,
    },
    Batch {
        images: Vec<ImageReference>,
        /// May be shorter than `images`
        prior_digests: Vec<Option<Digest>>,
    },
}

impl ImageTarget {
    /// Number of images covered
    pub fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Batch { images, .. } => images.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validated engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionConfig {
    pub target: ImageTarget,
    pub strategy: PaddingStrategy,
    pub platform: PlatformOverrides,
    pub max_concurrency: Option<usize>,
}

impl RevisionConfig {
    /// Configuration for a single image with default strategy and platform
    pub fn single(image: ImageReference, prior_digest: Option<Digest>) -> Self {
        Self::new(ImageTarget::Single {
            image,
            prior_digest,
        })
    }

    /// Configuration for a batch with default strategy and platform
    pub fn batch(images: Vec<ImageReference>, prior_digests: Vec<Option<Digest>>) -> Self {
        Self::new(ImageTarget::Batch {
            images,
            prior_digests,
        })
    }

    fn new(target: ImageTarget) -> Self {
        Self {
            target,
            strategy: PaddingStrategy::default(),
            platform: PlatformOverrides::default(),
            max_concurrency: None,
        }
    }

    pub fn with_strategy(mut self, strategy: PaddingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_platform(mut self, platform: PlatformOverrides) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }
}
