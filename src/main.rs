//! routegen - convention-based route synthesis for view-component directories.

mod cli;
mod config;
mod core;
mod discover;
mod hmr;
mod logger;
mod meta;
mod output;
mod route;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::RouteConfig;
use core::Pipeline;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Arc::new(RouteConfig::load(&cli)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(run(&cli, config))
}

async fn run(cli: &Cli, config: Arc<RouteConfig>) -> Result<()> {
    let pipeline = Pipeline::new(config);

    // One-shot commands wait for external metadata so their output is complete.
    if !cli.is_watch()
        && let Some(load) = pipeline.load_metadata()
    {
        load.await.context("metadata load task failed")?;
    }

    match &cli.command {
        Commands::Build { build_args, .. } => cli::build::run(&pipeline, build_args),
        Commands::Inspect { .. } => cli::inspect::run(&pipeline),
        Commands::Resolve { id, .. } => cli::resolve::run(&pipeline, id),
        Commands::Watch { .. } => cli::watch::run(pipeline).await,
    }
}
