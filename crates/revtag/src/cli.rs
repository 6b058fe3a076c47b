//! CLI argument parsing with clap

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use revtag_core::{ListInput, RevisionInputs};
use std::path::PathBuf;

/// revtag - Publish revision tags for container images whose digest changed
#[derive(Parser, Debug)]
#[command(name = "revtag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare digests and publish revision tags
    Run(RunArgs),

    /// Show version information
    Version(VersionArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

// Run command
//
// Every input can also be supplied as an `INPUT_*` environment variable,
// which is how GitHub Actions passes `with:` values to an action.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Image to check, as repository:version
    #[arg(long, env = "INPUT_IMAGE")]
    pub image: Option<String>,

    /// Previously recorded digest of --image
    #[arg(long, env = "INPUT_DIGEST")]
    pub digest: Option<String>,

    /// Images to check (JSON array, or newline/comma separated)
    #[arg(long, env = "INPUT_IMAGES")]
    pub images: Option<String>,

    /// Previously recorded digests, aligned with --images
    #[arg(long, env = "INPUT_DIGESTS")]
    pub digests: Option<String>,

    /// Revision padding: numerical, alphabetical, or alphabetical:<width>
    #[arg(long, env = "INPUT_STRATEGY")]
    pub strategy: Option<String>,

    /// Override the operating system when inspecting multi-platform images
    #[arg(long, env = "INPUT_OS")]
    pub os: Option<String>,

    /// Override the architecture when inspecting multi-platform images
    #[arg(long, env = "INPUT_ARCH")]
    pub arch: Option<String>,

    /// Override the architecture variant when inspecting multi-platform images
    #[arg(long, env = "INPUT_VARIANT")]
    pub variant: Option<String>,

    /// Maximum number of images processed at once
    #[arg(long, env = "INPUT_MAX_CONCURRENCY")]
    pub max_concurrency: Option<String>,

    /// Path to a revtag.yaml file with default inputs
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Path to the skopeo binary (default: looked up in PATH)
    #[arg(long, env = "REVTAG_SKOPEO")]
    pub skopeo: Option<PathBuf>,

    /// Path to the docker binary (default: looked up in PATH)
    #[arg(long, env = "REVTAG_DOCKER")]
    pub docker: Option<PathBuf>,

    /// Print the full result as JSON instead of named outputs
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Named inputs given on the command line or through the environment
    pub fn inputs(&self) -> Result<RevisionInputs> {
        let max_concurrency = match self.max_concurrency.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(
                value
                    .parse::<usize>()
                    .with_context(|| format!("Invalid max-concurrency: '{}'", value))?,
            ),
            _ => None,
        };

        Ok(RevisionInputs {
            image: self.image.clone(),
            digest: self.digest.clone(),
            images: self.images.as_deref().map(ListInput::from),
            digests: self.digests.as_deref().map(ListInput::from),
            strategy: self.strategy.clone(),
            os: self.os.clone(),
            arch: self.arch.clone(),
            variant: self.variant.clone(),
            max_concurrency,
        })
    }
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
