//! Run command: compare digests and publish revision tags

use crate::cli::RunArgs;
use crate::host::ActionsHost;
use crate::output;
use anyhow::{Context, Result};
use revtag_core::{
    EngineOutput, ImageTarget, RevisionConfig, RevisionEngine, RevisionInputs, RevisionResult,
};
use revtag_registry::tool_registry;
use tracing::{debug, info};

pub async fn run(args: RunArgs) -> Result<()> {
    let host = ActionsHost::from_env();

    match execute(&args, &host).await {
        Ok(()) => Ok(()),
        Err(e) => {
            host.error(&format!("{:#}", e));
            Err(e)
        }
    }
}

async fn execute(args: &RunArgs, host: &ActionsHost) -> Result<()> {
    // With --json, stdout carries nothing but the result document
    let grouped = !args.json;

    let config = {
        let _group = grouped.then(|| host.group("Configuration"));
        let config = load_config(args)?;
        if grouped {
            print_config(&config);
        }
        config
    };

    let registry = tool_registry(args.skopeo.clone(), args.docker.clone())?;
    let engine = RevisionEngine::new(registry);

    let result = {
        let _group = grouped.then(|| host.group("Processing"));
        engine.run(&config).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    host.write_outputs(&result)
        .context("Failed to write outputs")?;

    let _group = host.group("Summary");
    print_summary(&result);

    Ok(())
}

/// Merge config file inputs with CLI/environment inputs and validate them
fn load_config(args: &RunArgs) -> Result<RevisionConfig> {
    let cli_inputs = args.inputs()?;

    let inputs = match &args.config {
        Some(path) => {
            debug!("Loading inputs from {}", path);
            RevisionInputs::load(path)
                .with_context(|| format!("Failed to load config file {}", path))?
                .merge(cli_inputs)
        }
        None => cli_inputs,
    };

    let config = inputs.into_config()?;
    info!(
        "Checking {} image(s) with {} padding",
        config.target.len(),
        config.strategy
    );

    Ok(config)
}

fn print_config(config: &RevisionConfig) {
    match &config.target {
        ImageTarget::Single {
            image,
            prior_digest,
        } => {
            output::kv("Image", &image.to_string());
            output::kv(
                "Prior digest",
                prior_digest.as_ref().map_or("(none)", |d| d.as_str()),
            );
        }
        ImageTarget::Batch { images, .. } => {
            output::kv("Images", &images.len().to_string());
            for image in images {
                output::kv("  Image", &image.to_string());
            }
        }
    }

    output::kv("Strategy", &config.strategy.to_string());
    if !config.platform.is_empty() {
        output::kv("Platform", &config.platform.to_string());
    }
    if let Some(limit) = config.max_concurrency {
        output::kv("Max concurrency", &limit.to_string());
    }
}

fn print_summary(result: &EngineOutput) {
    match result {
        EngineOutput::Single(result) => print_result(result),
        EngineOutput::Batch(batch) => {
            for result in &batch.results {
                print_result(result);
            }
        }
    }
}

fn print_result(result: &RevisionResult) {
    match &result.revision_tag {
        Some(revision) => output::success(&format!(
            "{}: digest changed to {}, published {}:{}",
            result.image, result.new_digest, result.image.repository, revision
        )),
        None => output::info(&format!(
            "{}: digest {} unchanged",
            result.image, result.new_digest
        )),
    }
}
