//! CLI entry point for the PDF harvester.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::{
    DownloadEngine, HarvestConfig, HttpClient, Pipeline, PipelineOptions, PipelineReport,
    load_config, load_default_config,
};
use tracing::{debug, info, warn};

mod cli;
mod exit_handler;

use cli::Args;
use exit_handler::determine_exit_outcome;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = resolve_config(&args)?;
    debug!(?config, "effective configuration");

    let client = HttpClient::with_timeouts(config.connect_timeout_secs, config.request_timeout_secs);
    let engine = DownloadEngine::new(config.concurrency)?;
    let pipeline = Pipeline::new(
        client,
        engine,
        PipelineOptions {
            base_domain: config.base_domain.clone(),
            output_dir: config.output_dir.clone(),
            filename_style: config.filename_style,
        },
    );

    pipeline.ensure_output_dir().await.with_context(|| {
        format!(
            "Failed to create output directory '{}'",
            config.output_dir.display()
        )
    })?;

    info!(
        seeds = config.seeds.len(),
        output_dir = %config.output_dir.display(),
        "PDF harvester starting"
    );
    let report = pipeline.run(&config.seeds).await;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        println!("{json}");
    } else {
        log_summary(&report);
    }

    let exit = determine_exit_outcome(
        args.strict,
        report.succeeded() + report.skipped(),
        report.failed(),
    );
    Ok(exit.into())
}

fn resolve_config(args: &Args) -> Result<HarvestConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => load_default_config().context("Failed to load default config")?,
    };
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn log_summary(report: &PipelineReport) {
    for failure in &report.seed_failures {
        warn!(seed = %failure.seed, error = %failure.message, "seed page skipped");
    }
    info!(
        links_found = report.links_found,
        unique_urls = report.unique_urls,
        rejected = report.rejected.len(),
        succeeded = report.succeeded(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Harvest complete"
    );
}
