//! Type declaration artifact.
//!
//! Declares the route list for type checkers, plus literal unions of every
//! route name and fully qualified path in the current tree:
//!
//! ```ts
//! import { RouteRecordRaw } from 'vue-router';
//!
//! export type RouteName = 'home' | 'about';
//! export type RoutePath = '/' | '/about';
//!
//! declare const routes: RouteRecordRaw[];
//! export default routes;
//! ```

use std::fs;
use std::io;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::route::{RoutePath, RouteRecord};

/// Declaration file content for `routes`.
pub fn render(routes: &[RouteRecord]) -> String {
    let (names, paths) = collect_literals(routes);

    let mut out = String::from("// Generated by routegen. Do not edit.\n");
    out.push_str("import { RouteRecordRaw } from 'vue-router';\n\n");
    out.push_str(&format!("export type RouteName = {};\n", union(&names)));
    out.push_str(&format!("export type RoutePath = {};\n\n", union(&paths)));
    out.push_str("declare const routes: RouteRecordRaw[];\n");
    out.push_str("export default routes;\n");
    out
}

/// Write the declaration, creating parent directories.
pub fn write(path: &Path, routes: &[RouteRecord]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(routes))
}

/// Write the declaration; failure is logged and does not fail the pass.
pub fn write_logged(path: &Path, routes: &[RouteRecord]) -> bool {
    match write(path, routes) {
        Ok(()) => {
            crate::debug!("declaration"; "wrote {}", path.display());
            true
        }
        Err(e) => {
            crate::log!("error"; "failed to write declaration {}: {}", path.display(), e);
            false
        }
    }
}

/// Route names and full paths, first-seen order, deduplicated.
fn collect_literals(routes: &[RouteRecord]) -> (Vec<String>, Vec<String>) {
    let mut names = Vec::new();
    let mut paths = Vec::new();
    let mut seen_paths = FxHashSet::default();

    fn visit(
        record: &RouteRecord,
        base: Option<&RoutePath>,
        names: &mut Vec<String>,
        paths: &mut Vec<String>,
        seen_paths: &mut FxHashSet<String>,
    ) {
        let full = match base {
            Some(base) => base.join(&record.path),
            None => RoutePath::from_relative(&record.path),
        };
        if let Some(name) = &record.name {
            names.push(name.clone());
        }
        if seen_paths.insert(full.as_str().to_string()) {
            paths.push(full.as_str().to_string());
        }
        for child in &record.children {
            visit(child, Some(&full), names, paths, seen_paths);
        }
    }

    for route in routes {
        visit(route, None, &mut names, &mut paths, &mut seen_paths);
    }
    (names, paths)
}

fn union(values: &[String]) -> String {
    if values.is_empty() {
        return "never".to_string();
    }
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(" | ")
}
