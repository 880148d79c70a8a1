//! Route file discovery.
//!
//! Walks the routes directory and yields one [`DiscoveredFile`] per file with
//! an accepted extension. Identities are project-rooted and `/`-separated
//! (`/src/views/users/index.vue`) regardless of platform.
//!
//! Order: within a directory, files come before subdirectories, each group
//! sorted by name. This is the discovery order the builder relies on.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::route::{DiscoveredFile, RouteRules};

/// Enumerate route files under `project_root` + `rules.root`.
///
/// A missing routes directory yields an empty list.
pub fn scan(project_root: &Path, rules: &RouteRules, lazy: bool) -> Vec<DiscoveredFile> {
    let routes_dir = disk_path(project_root, &rules.root);
    if !routes_dir.is_dir() {
        crate::debug!("scan"; "routes directory {} does not exist", routes_dir.display());
        return Vec::new();
    }

    let mut identities: Vec<String> = WalkDir::new(&routes_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| identity_of(project_root, &e.path()))
        .filter(|id| rules.extensions.iter().any(|ext| id.ends_with(ext.as_str())))
        .collect();
    identities.sort_by(|a, b| discovery_order(a, b));

    crate::debug!("scan"; "found {} route files in {}", identities.len(), rules.root);

    identities
        .into_iter()
        .map(|id| DiscoveredFile::new(id, lazy))
        .collect()
}

/// Read a component by its identity (for embedded metadata).
pub fn read_component(project_root: &Path, identity: &str) -> io::Result<String> {
    std::fs::read_to_string(disk_path(project_root, identity))
}

/// Map a project-rooted identity back to a filesystem path.
pub fn disk_path(project_root: &Path, identity: &str) -> PathBuf {
    project_root.join(identity.trim_start_matches('/'))
}

/// Project-rooted identity of a filesystem path, if it is inside the project.
pub fn identity_of(project_root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(project_root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}", parts.join("/")))
}

/// Files before directories at each level, then by name.
fn discovery_order(a: &str, b: &str) -> Ordering {
    let mut left = a.split('/');
    let mut right = b.split('/');
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x == y => continue,
            (Some(x), Some(y)) => {
                let x_is_dir = left.clone().next().is_some();
                let y_is_dir = right.clone().next().is_some();
                return x_is_dir.cmp(&y_is_dir).then_with(|| x.cmp(y));
            }
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}
