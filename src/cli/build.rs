//! `build`: one pass, then outputs.
//!
//! - route JSON (default) or the registration file with routes injected (`--inject`)
//! - declaration artifact when enabled

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::BuildArgs;
use crate::{
    core::Pipeline,
    log,
    output::{self, inject},
};

pub fn run(pipeline: &Pipeline, args: &BuildArgs) -> Result<()> {
    let tree = pipeline.run_pass();

    let content = if args.inject {
        injected_registration(pipeline, &tree.routes)?
    } else if args.pretty {
        serde_json::to_string_pretty(&tree.routes)? + "\n"
    } else {
        serde_json::to_string(&tree.routes)? + "\n"
    };

    match &args.output {
        Some(path) => write_output(path, &content)?,
        None => print!("{content}"),
    }

    pipeline.finalize(&tree);

    log!("routes"; "{} records, {} warnings", tree.record_count(), tree.warnings.len());
    Ok(())
}

fn injected_registration(pipeline: &Pipeline, routes: &[crate::route::RouteRecord]) -> Result<String> {
    let path = pipeline.config().registration_file();
    let source = fs::read_to_string(&path)
        .with_context(|| format!("failed to read registration file {}", path.display()))?;

    match inject::inject(&source, &output::render(routes)) {
        Some(code) => Ok(code),
        None => bail!(
            "no `const routes = []` declaration found in {}",
            path.display()
        ),
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
