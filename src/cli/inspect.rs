//! `inspect`: print the route tree.

use anyhow::Result;

use crate::{core::Pipeline, log, output::inspect};

pub fn run(pipeline: &Pipeline) -> Result<()> {
    let tree = pipeline.run_pass();
    print!("{}", inspect::render_tree(&tree.routes));

    let (records, paths) = inspect::count_summary(&tree.routes);
    log!("routes"; "{} records, {} paths, {} warnings", records, paths, tree.warnings.len());
    Ok(())
}
