use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Container image reference in `repository:version` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference {
    /// Repository path, including any registry host (e.g., "ghcr.io/acme/app")
    pub repository: String,
    /// Nominal version tag (e.g., "1.0.0")
    pub version: String,
}

impl ImageReference {
    /// Create a reference from its parts
    pub fn new(repository: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            version: version.into(),
        }
    }

    /// Parse an image reference string like "acme/app:1.0.0"
    ///
    /// The string is split on the first `:`. A missing or empty version is
    /// rejected with [`Error::MissingVersion`].
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((repository, version)) if !repository.is_empty() && !version.is_empty() => {
                Ok(Self::new(repository, version))
            }
            _ => Err(Error::missing_version(s)),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.version)
    }
}

impl FromStr for ImageReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Content digest reported by the registry
///
/// Opaque: only equality is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Treat empty or whitespace-only input as "no digest"
    pub fn parse_optional(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self::new(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Digest {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Platform selection passed to the digest inspector for multi-arch images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverrides {
    pub os: Option<String>,
    pub architecture: Option<String>,
    pub variant: Option<String>,
}

impl PlatformOverrides {
    /// Build overrides from optional host inputs, dropping blank values
    pub fn new(os: Option<&str>, architecture: Option<&str>, variant: Option<&str>) -> Self {
        Self {
            os: non_blank(os),
            architecture: non_blank(architecture),
            variant: non_blank(variant),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.os.is_none() && self.architecture.is_none() && self.variant.is_none()
    }
}

impl fmt::Display for PlatformOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os = self.os.as_deref().unwrap_or("*");
        let arch = self.architecture.as_deref().unwrap_or("*");
        write!(f, "{}/{}", os, arch)?;
        if let Some(variant) = &self.variant {
            write!(f, "/{}", variant)?;
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Outcome of processing a single image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionResult {
    pub image: ImageReference,
    pub prior_digest: Option<Digest>,
    pub new_digest: Digest,
    /// Present exactly when `new_digest` differs from `prior_digest`
    pub revision_tag: Option<String>,
}

impl RevisionResult {
    /// Whether a new revision tag was produced
    pub fn changed(&self) -> bool {
        self.revision_tag.is_some()
    }
}

/// Results of a batch, index-aligned with the input image list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<RevisionResult>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Current digest of every image, in input order
    pub fn digests(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|r| r.new_digest.to_string())
            .collect()
    }

    /// Revision tag of every image, `None` where no revision was produced
    pub fn revisions(&self) -> Vec<Option<String>> {
        self.results.iter().map(|r| r.revision_tag.clone()).collect()
    }
}
