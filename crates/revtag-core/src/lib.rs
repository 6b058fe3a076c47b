//! # revtag-core
//!
//! Revision resolution engine for revtag:
//! - Parsing `repository:version` image references
//! - Padding strategies for the revision counter
//! - Extracting existing revisions and computing the next one
//! - Per-image inspect/compare/tag workflow
//! - Concurrent, order-preserving batch orchestration
//!
//! The engine performs no I/O of its own. Registry access goes through the
//! [`DigestInspector`], [`TagLister`] and [`TagPublisher`] traits.
//!
//! # Example
//!
//! ```no_run
//! use revtag_core::{Registry, RevisionEngine, RevisionInputs};
//!
//! # async fn example(registry: Registry) -> revtag_core::Result<()> {
//! let config = RevisionInputs {
//!     image: Some("ghcr.io/acme/app:1.0.0".to_string()),
//!     digest: Some("sha256:42".to_string()),
//!     strategy: Some("alphabetical".to_string()),
//!     ..Default::default()
//! }
//! .into_config()?;
//!
//! let output = RevisionEngine::new(registry).run(&config).await?;
//! println!("{:?}", output);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod processor;
pub mod registry;
pub mod revision;
pub mod strategy;
pub mod types;

pub use batch::BatchOrchestrator;
pub use config::{ImageTarget, ListInput, RevisionConfig, RevisionInputs};
pub use engine::{EngineOutput, RevisionEngine};
pub use error::{Error, Result};
pub use processor::ImageProcessor;
pub use registry::{DigestInspector, Registry, TagLister, TagPublisher};
pub use revision::{extract_revision, next_revision};
pub use strategy::PaddingStrategy;
pub use types::{BatchResult, Digest, ImageReference, PlatformOverrides, RevisionResult};
