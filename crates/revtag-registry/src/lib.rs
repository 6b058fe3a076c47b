//! Registry collaborators for revtag
//!
//! This crate provides the concrete implementations of the revtag-core
//! registry traits:
//! - [`SkopeoClient`]: digest inspection and tag listing via `skopeo`
//! - [`BuildxPublisher`]: tag creation via `docker buildx imagetools`
//!
//! Registry credentials are whatever the tools themselves are configured
//! with (`docker login`, `skopeo login`).
//!
//! # Example
//!
//! ```no_run
//! use revtag_registry::tool_registry;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = tool_registry(None, None)?;
//! # let _ = registry;
//! # Ok(())
//! # }
//! ```

pub mod buildx;
pub mod command;
pub mod skopeo;

pub use buildx::BuildxPublisher;
pub use skopeo::SkopeoClient;

use anyhow::Result;
use revtag_core::Registry;
use std::path::PathBuf;
use std::sync::Arc;

/// Build engine registry handles backed by skopeo and docker
///
/// Explicit binary paths take precedence over a PATH lookup.
pub fn tool_registry(skopeo: Option<PathBuf>, docker: Option<PathBuf>) -> Result<Registry> {
    let skopeo = match skopeo {
        Some(path) => SkopeoClient::with_binary(path),
        None => SkopeoClient::new()?,
    };
    let docker = match docker {
        Some(path) => BuildxPublisher::with_binary(path),
        None => BuildxPublisher::new()?,
    };

    let skopeo = Arc::new(skopeo);
    Ok(Registry::new(skopeo.clone(), skopeo, Arc::new(docker)))
}

/// Version of the revtag-registry crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
