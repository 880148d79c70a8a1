//! `resolve`: answer a module id the way the virtual module would.

use anyhow::{Result, bail};

use crate::{core::Pipeline, log, output::VirtualRoutes};

pub fn run(pipeline: &Pipeline, id: &str) -> Result<()> {
    let Some(resolved) = VirtualRoutes::resolve_id(id) else {
        bail!("`{}` is not provided by routegen", id.escape_default());
    };
    pipeline.run_pass();

    // resolved id contains a NUL; show it escaped
    log!("resolve"; "{} -> {}", id, resolved.escape_default());
    if let Some(code) = pipeline.virtual_routes().load(resolved) {
        print!("{code}");
    }
    Ok(())
}
