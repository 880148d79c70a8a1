//! `watch`: initial pass, then a debounced pass per route-set change.
//!
//! ```text
//! RouteWatcher ──ChangeSet──▶ pass ──▶ publish ──▶ Invalidator ──▶ stdout (JSON lines)
//! ```
//!
//! The watcher is attached before the initial pass, so edits made while that
//! pass runs are picked up by the first debounce window.

use std::io::stdout;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::{
    core::{self, Pipeline},
    hmr::{ChangeSet, ImporterGraph, Invalidator, JsonLinesChannel, Outcome, RouteWatcher, WatchFilter},
    log,
    logger::{status_error, status_success, status_warning},
    route::RouteTree,
};

pub async fn run(pipeline: Pipeline) -> Result<()> {
    let config = pipeline.config();
    let filter = WatchFilter {
        routes_dir: config.routes_dir(),
        extensions: config.routes.extensions.clone(),
        meta_source: config.meta_source(),
    };

    let (changes_tx, mut changes_rx) = mpsc::channel::<ChangeSet>(16);
    let watcher = RouteWatcher::new(filter, changes_tx).context("failed to start file watcher")?;

    if let Some(load) = pipeline.load_metadata() {
        load.await.context("metadata load task failed")?;
    }
    let tree = pipeline.run_pass();
    pipeline.finalize(&tree);
    report_pass(&tree);
    log!("watch"; "watching {}", config.routes_dir().display());

    core::set_watching(true);
    let watcher_task = tokio::spawn(watcher.run());

    let invalidator = Invalidator::new(pipeline.invalidation_seeds());
    let mut channel = JsonLinesChannel::new(stdout());

    loop {
        tokio::select! {
            biased;
            _ = core::shutdown_requested() => break,
            Some(changes) = changes_rx.recv() => {
                handle_changes(&pipeline, &invalidator, &mut channel, changes).await;
            }
            else => break,
        }
    }

    watcher_task.abort();
    core::set_watching(false);
    Ok(())
}

async fn handle_changes(
    pipeline: &Pipeline,
    invalidator: &Invalidator,
    channel: &mut JsonLinesChannel<std::io::Stdout>,
    changes: ChangeSet,
) {
    if changes.metadata
        && let Some(load) = pipeline.load_metadata()
        && let Err(e) = load.await
    {
        status_error("metadata reload failed", &e.to_string());
    }

    let tree = pipeline.run_pass();
    pipeline.finalize(&tree);
    report_pass(&tree);

    // the host rewrites its graph as modules load; read the latest
    let graph = ImporterGraph::load(&pipeline.config().graph_path());
    crate::debug!("hmr"; "module graph: {} modules", graph.module_count());
    match invalidator.run(&graph, channel).await {
        Outcome::Targeted(modules) => {
            log!("hmr"; "updated {} module{}", modules.len(), if modules.len() == 1 { "" } else { "s" });
        }
        Outcome::FullReload(reason) => log!("hmr"; "full reload: {}", reason),
    }
}

fn report_pass(tree: &RouteTree) {
    let summary = format!("routes updated ({} records)", tree.record_count());
    match tree.warnings.len() {
        0 => status_success(&summary),
        n => status_warning(&format!("{summary}, {n} warning{}", if n == 1 { "" } else { "s" })),
    }
}
