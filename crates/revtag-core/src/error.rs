//! Error types for revtag-core

use thiserror::Error;

/// Result type alias using revtag-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions raised by the revision engine
///
/// None of these are retried. Each carries the offending image reference
/// (or descriptor) so the caller can act on it.
#[derive(Error, Debug)]
pub enum Error {
    /// Strategy descriptor could not be parsed
    #[error("Invalid strategy: '{descriptor}'. Expected 'numerical', 'alphabetical' or 'alphabetical:<width>'")]
    InvalidStrategy { descriptor: String },

    /// Image reference has no version component
    #[error("No version specified in image: {image}")]
    MissingVersion { image: String },

    /// Registry inspection returned no digest
    #[error("No existing digest found for image: {image}")]
    DigestNotFound { image: String },

    /// Registry inspection itself failed
    #[error("Failed to inspect image {image}: {message}")]
    InspectFailed { image: String, message: String },

    /// No tag in the repository starts with the version
    #[error("No version tag found for image: {image}")]
    NoVersionTag { image: String },

    /// Tag listing failed
    #[error("Failed to list tags for image {image}: {message}")]
    ListFailed { image: String, message: String },

    /// Tag creation failed
    #[error("Failed to publish tag {tag} for image {image}: {message}")]
    PublishFailed {
        image: String,
        tag: String,
        message: String,
    },

    /// Inputs do not describe a runnable configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned image task panicked or was aborted
    #[error("Image task failed: {message}")]
    TaskFailed { message: String },
}

impl Error {
    /// Create an invalid strategy error
    pub fn invalid_strategy(descriptor: impl Into<String>) -> Self {
        Self::InvalidStrategy {
            descriptor: descriptor.into(),
        }
    }

    /// Create a missing version error
    pub fn missing_version(image: impl Into<String>) -> Self {
        Self::MissingVersion {
            image: image.into(),
        }
    }

    /// Create a digest not found error
    pub fn digest_not_found(image: impl Into<String>) -> Self {
        Self::DigestNotFound {
            image: image.into(),
        }
    }

    /// Create an inspect failed error
    pub fn inspect_failed(image: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InspectFailed {
            image: image.into(),
            message: message.into(),
        }
    }

    /// Create a no version tag error
    pub fn no_version_tag(image: impl Into<String>) -> Self {
        Self::NoVersionTag {
            image: image.into(),
        }
    }

    /// Create a list failed error
    pub fn list_failed(image: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ListFailed {
            image: image.into(),
            message: message.into(),
        }
    }

    /// Create a publish failed error
    pub fn publish_failed(
        image: impl Into<String>,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::PublishFailed {
            image: image.into(),
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Image reference the error refers to, when there is one
    pub fn image(&self) -> Option<&str> {
        match self {
            Self::MissingVersion { image }
            | Self::DigestNotFound { image }
            | Self::InspectFailed { image, .. }
            | Self::NoVersionTag { image }
            | Self::ListFailed { image, .. }
            | Self::PublishFailed { image, .. } => Some(image),
            _ => None,
        }
    }
}
