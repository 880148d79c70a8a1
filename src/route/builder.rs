//! Two-pass route tree builder.
//!
//! Every phase takes the [`SynthesisContext`] by value and hands it to the
//! next one, so a pass owns all of its state:
//!
//! ```text
//! classify → redirect_root → nest → attach_meta → check_components → dedupe_names
//! ```
//!
//! Layouts are matched longest-directory-first, so the deepest enclosing
//! layout always wins regardless of discovery order.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use super::names::dedupe_names;
use super::path::{self, FileKind, RoutePath};
use super::record::{ComponentRef, DiscoveredFile, RouteRecord};
use crate::meta::MetadataResolver;

/// Path rules for one routes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRules {
    /// Project-rooted routes directory (`/src/views`).
    pub root: String,
    /// Accepted extensions including the dot (`.vue`).
    pub extensions: Vec<String>,
    /// Directory names dropped from discovery.
    pub excludes: Vec<String>,
    /// Layout sentinel file stem (`_layout`).
    pub layout_name: String,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            root: "/src/views".to_string(),
            extensions: vec![".vue".to_string()],
            excludes: vec!["components".to_string()],
            layout_name: "_layout".to_string(),
        }
    }
}

/// Non-fatal problems found during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisWarning {
    /// A non-redirect record ended up without a component.
    MissingComponent { path: String },
    /// A bracket pattern other than a single `[name]` element.
    UnsupportedSegment { file: String, segment: String },
    /// Second layout for the same directory.
    DuplicateLayout { dir: String, ignored: String },
    /// Two files normalized to the same raw route key.
    DuplicateRoute { key: String, ignored: String },
    /// A leaf owns the same path as a layout, so it wins the exact match.
    LayoutShadowed { path: String, layout: String, leaf: String },
    /// Route name already taken; the later record was renamed.
    NameCollision { name: String, renamed: String, source: String },
}

impl fmt::Display for SynthesisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingComponent { path } => write!(f, "route `{path}` has no component"),
            Self::UnsupportedSegment { file, segment } => write!(
                f,
                "unsupported dynamic segment `{segment}` in {file}, kept literally"
            ),
            Self::DuplicateLayout { dir, ignored } => {
                write!(f, "layout for `/{dir}` already defined, ignoring {ignored}")
            }
            Self::DuplicateRoute { key, ignored } => {
                write!(f, "route `{key}` already defined, ignoring {ignored}")
            }
            Self::LayoutShadowed { path, layout, leaf } => write!(
                f,
                "{leaf} also claims `{path}` and shadows layout {layout}; move it to an index file"
            ),
            Self::NameCollision {
                name,
                renamed,
                source,
            } => write!(
                f,
                "route name `{name}` is taken, renamed to `{renamed}` ({source})"
            ),
        }
    }
}

/// Output of one synthesis pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTree {
    pub routes: Vec<RouteRecord>,
    pub warnings: Vec<SynthesisWarning>,
}

impl RouteTree {
    /// Log every warning collected during the pass.
    pub fn report(&self) {
        for warning in &self.warnings {
            crate::log!("warn"; "{}", warning);
        }
    }

    /// Total number of records, nested ones included.
    pub fn record_count(&self) -> usize {
        let mut count = 0;
        for route in &self.routes {
            route.walk(&mut |_| count += 1);
        }
        count
    }
}

/// Build the route tree for a set of discovered files.
pub fn synthesize(
    files: &[DiscoveredFile],
    rules: &RouteRules,
    resolver: MetadataResolver<'_>,
) -> RouteTree {
    SynthesisContext::new(rules)
        .classify(files)
        .redirect_root()
        .nest()
        .attach_meta(resolver)
        .check_components()
        .dedupe_names()
        .finish()
}

// ============================================================================
// Context
// ============================================================================

/// Layout file governing a directory.
#[derive(Debug)]
struct LayoutEntry {
    /// Raw relative directory, empty for the root layout.
    dir: String,
    component: ComponentRef,
}

impl LayoutEntry {
    /// Directory-boundary containment, never plain string prefix.
    fn contains(&self, key: &str) -> bool {
        self.dir.is_empty()
            || key
                .strip_prefix(self.dir.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    fn route_path(&self) -> RoutePath {
        RoutePath::from_relative(&path::convert_dynamic(&self.dir))
    }
}

/// Leaf waiting to be placed, consumed by [`SynthesisContext::nest`].
#[derive(Debug)]
struct RouteMapEntry {
    /// Raw relative path before dynamic conversion (`users/[id]/index`).
    key: String,
    final_path: RoutePath,
    name: String,
    component: ComponentRef,
}

/// State threaded through the phases of one pass.
#[derive(Debug)]
pub struct SynthesisContext<'r> {
    rules: &'r RouteRules,
    routes: Vec<RouteRecord>,
    layouts: Vec<LayoutEntry>,
    route_map: Vec<RouteMapEntry>,
    has_root_index: bool,
    warnings: Vec<SynthesisWarning>,
}

impl<'r> SynthesisContext<'r> {
    pub fn new(rules: &'r RouteRules) -> Self {
        Self {
            rules,
            routes: Vec::new(),
            layouts: Vec::new(),
            route_map: Vec::new(),
            has_root_index: false,
            warnings: Vec::new(),
        }
    }

    /// Pass 1: sort files into root index, layouts and leaves.
    pub fn classify(mut self, files: &[DiscoveredFile]) -> Self {
        let rules = self.rules;
        let mut keys: FxHashSet<&str> = FxHashSet::default();

        for file in files {
            let Some(relative) = path::strip_root(&file.raw_path, &rules.root, &rules.extensions)
            else {
                crate::debug!("routes"; "outside routes root: {}", file.raw_path);
                continue;
            };

            if path::is_excluded(relative, &rules.excludes) {
                crate::debug!("routes"; "excluded: {}", file.raw_path);
                continue;
            }

            match path::classify(relative, &rules.layout_name) {
                FileKind::RootIndex => {
                    if self.has_root_index {
                        self.warnings.push(SynthesisWarning::DuplicateRoute {
                            key: "index".to_string(),
                            ignored: file.raw_path.clone(),
                        });
                        continue;
                    }
                    self.has_root_index = true;
                    self.routes
                        .push(RouteRecord::leaf("/", "home", file.loader.clone()));
                    crate::debug!("routes"; "root route / -> {}", file.raw_path);
                }
                FileKind::Layout { dir } => {
                    if self.layouts.iter().any(|layout| layout.dir == dir) {
                        self.warnings.push(SynthesisWarning::DuplicateLayout {
                            dir: dir.to_string(),
                            ignored: file.raw_path.clone(),
                        });
                        continue;
                    }
                    crate::debug!("routes"; "layout /{} -> {}", dir, file.raw_path);
                    self.layouts.push(LayoutEntry {
                        dir: dir.to_string(),
                        component: file.loader.clone(),
                    });
                }
                FileKind::Leaf { key } => {
                    if !keys.insert(key) {
                        self.warnings.push(SynthesisWarning::DuplicateRoute {
                            key: key.to_string(),
                            ignored: file.raw_path.clone(),
                        });
                        continue;
                    }
                    if let Some(segment) = path::unsupported_segment(key) {
                        self.warnings.push(SynthesisWarning::UnsupportedSegment {
                            file: file.raw_path.clone(),
                            segment: segment.to_string(),
                        });
                    }
                    let relative_path = path::normalize_relative(key);
                    self.route_map.push(RouteMapEntry {
                        key: key.to_string(),
                        final_path: RoutePath::from_relative(&relative_path),
                        name: path::derive_name(&relative_path),
                        component: file.loader.clone(),
                    });
                }
            }
        }
        self
    }

    /// Without a root index, point `/` at the first discovered layout.
    ///
    /// A root layout already claims `/`, so no redirect is added for it.
    pub fn redirect_root(mut self) -> Self {
        if self.has_root_index || self.layouts.iter().any(|layout| layout.dir.is_empty()) {
            return self;
        }
        if let Some(first) = self.layouts.first() {
            let target = first.route_path();
            crate::debug!("routes"; "no root index, redirecting / -> {}", target);
            self.routes.push(RouteRecord::redirect("/", target.as_str()));
        }
        self
    }

    /// Pass 2: place every leaf under its deepest enclosing layout.
    pub fn nest(mut self) -> Self {
        let layouts = std::mem::take(&mut self.layouts);
        let mut by_depth: Vec<&LayoutEntry> = layouts.iter().collect();
        // Stable: equal-length directories keep discovery order.
        by_depth.sort_by(|a, b| b.dir.len().cmp(&a.dir.len()));

        // layout dir -> index of the record created for it
        let mut placed: FxHashMap<&str, usize> = FxHashMap::default();
        if let Some(root_layout) = layouts.iter().find(|layout| layout.dir.is_empty()) {
            self.wrap_root_index(root_layout, &mut placed);
        }

        for entry in std::mem::take(&mut self.route_map) {
            let Some(&layout) = by_depth.iter().find(|layout| layout.contains(&entry.key)) else {
                self.routes.push(RouteRecord::leaf(
                    entry.final_path.as_str(),
                    entry.name,
                    entry.component,
                ));
                continue;
            };

            let child_raw = if layout.dir.is_empty() {
                entry.key.as_str()
            } else {
                &entry.key[layout.dir.len() + 1..]
            };
            let child_path = path::normalize_relative(child_raw);
            let name = entry.name.replace(':', "");

            let parent = self.layout_record(layout, &mut placed);
            crate::debug!("routes"; "nesting `{}` under {}", child_path, self.routes[parent].path);
            self.routes[parent]
                .children
                .push(RouteRecord::leaf(child_path, name, entry.component));
        }

        self.check_shadowed(&placed);
        self.layouts = layouts;
        self
    }

    /// Move the root index under the root layout as its `""` child.
    fn wrap_root_index<'l>(
        &mut self,
        layout: &'l LayoutEntry,
        placed: &mut FxHashMap<&'l str, usize>,
    ) {
        let Some(index) = self
            .routes
            .iter()
            .position(|route| !route.is_redirect() && route.path == "/")
        else {
            return;
        };
        let wrapper = RouteRecord::layout("/", layout.component.clone());
        let mut home = std::mem::replace(&mut self.routes[index], wrapper);
        home.path = String::new();
        self.routes[index].children.push(home);
        placed.insert(layout.dir.as_str(), index);
    }

    /// Index of the record for `layout`, created on first use.
    ///
    /// Only records made for a layout are reused; a leaf on the same path
    /// keeps its own record.
    fn layout_record<'l>(
        &mut self,
        layout: &'l LayoutEntry,
        placed: &mut FxHashMap<&'l str, usize>,
    ) -> usize {
        if let Some(&index) = placed.get(layout.dir.as_str()) {
            return index;
        }
        let path = layout.route_path();
        self.routes
            .push(RouteRecord::layout(path.as_str(), layout.component.clone()));
        let index = self.routes.len() - 1;
        placed.insert(layout.dir.as_str(), index);
        index
    }

    /// Warn about top-level leaves that sit on a layout's own path.
    fn check_shadowed(&mut self, placed: &FxHashMap<&str, usize>) {
        let layout_indices: FxHashSet<usize> = placed.values().copied().collect();
        let identity = |route: &RouteRecord| {
            route
                .component
                .as_ref()
                .map_or_else(|| route.path.clone(), |c| c.identity().to_string())
        };

        for (i, layout) in self.routes.iter().enumerate() {
            if !layout_indices.contains(&i) {
                continue;
            }
            let shadowing = self.routes.iter().enumerate().find(|(j, route)| {
                !layout_indices.contains(j) && !route.is_redirect() && route.path == layout.path
            });
            if let Some((_, leaf)) = shadowing {
                self.warnings.push(SynthesisWarning::LayoutShadowed {
                    path: layout.path.clone(),
                    layout: identity(layout),
                    leaf: identity(leaf),
                });
            }
        }
    }

    /// Resolve metadata for every non-redirect record by its full path.
    pub fn attach_meta(mut self, resolver: MetadataResolver<'_>) -> Self {
        for route in &mut self.routes {
            if route.is_redirect() {
                continue;
            }
            let full = RoutePath::from_relative(&route.path);
            attach_meta_recursive(route, &full, &resolver);
        }
        self
    }

    /// Warn about records that will not render anything.
    pub fn check_components(mut self) -> Self {
        let mut missing = Vec::new();
        for route in &self.routes {
            route.walk(&mut |record| {
                if !record.is_redirect() && record.component.is_none() {
                    missing.push(SynthesisWarning::MissingComponent {
                        path: record.path.clone(),
                    });
                }
            });
        }
        self.warnings.extend(missing);
        self
    }

    pub fn dedupe_names(mut self) -> Self {
        let renamed = dedupe_names(&mut self.routes);
        self.warnings.extend(renamed);
        self
    }

    pub fn finish(self) -> RouteTree {
        RouteTree {
            routes: self.routes,
            warnings: self.warnings,
        }
    }
}

fn attach_meta_recursive(record: &mut RouteRecord, full: &RoutePath, resolver: &MetadataResolver<'_>) {
    let identity = record.component.as_ref().map(ComponentRef::identity);
    record.meta = resolver.resolve(full, identity);
    for child in &mut record.children {
        let child_full = full.join(&child.path);
        attach_meta_recursive(child, &child_full, resolver);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{EmbeddedMeta, ExternalMeta};
    use crate::route::Meta;
    use serde_json::json;

    fn files(paths: &[&str]) -> Vec<DiscoveredFile> {
        paths
            .iter()
            .map(|p| DiscoveredFile::new(format!("/src/views/{p}.vue"), true))
            .collect()
    }

    fn build(paths: &[&str]) -> RouteTree {
        let external = ExternalMeta::new();
        let embedded = EmbeddedMeta::new();
        synthesize(
            &files(paths),
            &RouteRules::default(),
            MetadataResolver::new(&external, Some(&embedded)),
        )
    }

    fn shape(routes: &[RouteRecord]) -> serde_json::Value {
        routes
            .iter()
            .map(|r| {
                let mut v = json!({ "path": r.path });
                if let Some(name) = &r.name {
                    v["name"] = json!(name);
                }
                if let Some(redirect) = &r.redirect {
                    v["redirect"] = json!(redirect);
                }
                if !r.children.is_empty() {
                    v["children"] = shape(&r.children);
                }
                v
            })
            .collect()
    }

    #[test]
    fn test_concrete_scenario() {
        let tree = build(&["index", "about", "users/_layout", "users/index", "users/[id]/index"]);
        assert_eq!(
            shape(&tree.routes),
            json!([
                {"path": "/", "name": "home"},
                {"path": "/about", "name": "about"},
                {"path": "/users", "children": [
                    {"path": "", "name": "users"},
                    {"path": ":id", "name": "users-id"},
                ]},
            ])
        );
        assert!(tree.warnings.is_empty());

        let users = &tree.routes[2];
        assert_eq!(
            users.component.as_ref().map(ComponentRef::identity),
            Some("/src/views/users/_layout.vue")
        );
        assert_eq!(
            users.children[1].component.as_ref().map(ComponentRef::identity),
            Some("/src/views/users/[id]/index.vue")
        );
    }

    #[test]
    fn test_redirect_without_root_index() {
        let tree = build(&["dashboard/_layout", "dashboard/index", "admin/_layout", "admin/users"]);
        assert_eq!(tree.routes[0], RouteRecord::redirect("/", "/dashboard"));
    }

    #[test]
    fn test_root_index_suppresses_redirect() {
        let tree = build(&["dashboard/_layout", "dashboard/index", "index"]);
        assert!(tree.routes.iter().all(|r| !r.is_redirect()));
        assert_eq!(tree.routes[0].path, "/");
        assert_eq!(tree.routes[0].name.as_deref(), Some("home"));
    }

    #[test]
    fn test_no_layouts_no_redirect() {
        let tree = build(&["about", "contact"]);
        assert_eq!(shape(&tree.routes), json!([
            {"path": "/about", "name": "about"},
            {"path": "/contact", "name": "contact"},
        ]));
    }

    #[test]
    fn test_deepest_layout_wins() {
        // shallow layout discovered last must not steal the leaf
        let tree = build(&["admin/settings/_layout", "admin/settings/profile/index", "admin/_layout", "admin/index"]);
        let settings = tree.routes.iter().find(|r| r.path == "/admin/settings").unwrap();
        assert_eq!(settings.children.len(), 1);
        assert_eq!(settings.children[0].path, "profile");
        assert_eq!(settings.children[0].name.as_deref(), Some("admin-settings-profile"));

        let admin = tree.routes.iter().find(|r| r.path == "/admin").unwrap();
        assert_eq!(admin.children.len(), 1);
        assert_eq!(admin.children[0].path, "");
    }

    #[test]
    fn test_layout_is_directory_boundary_prefix() {
        let tree = build(&["user/_layout", "user/index", "users/list"]);
        let user = tree.routes.iter().find(|r| r.path == "/user").unwrap();
        assert_eq!(user.children.len(), 1);
        assert!(tree.routes.iter().any(|r| r.path == "/users/list"));
    }

    #[test]
    fn test_dynamic_layout_directory() {
        let tree = build(&["index", "orgs/[org]/_layout", "orgs/[org]/index", "orgs/[org]/repos/[repo]"]);
        let org = tree.routes.iter().find(|r| r.path == "/orgs/:org").unwrap();
        assert_eq!(shape(&org.children), json!([
            {"path": "", "name": "orgs-org"},
            {"path": "repos/:repo", "name": "orgs-org-repos-repo"},
        ]));
    }

    #[test]
    fn test_root_layout_wraps_everything() {
        let tree = build(&["_layout", "about", "blog/index"]);
        assert_eq!(tree.routes.len(), 1);
        assert_eq!(shape(&tree.routes), json!([
            {"path": "/", "children": [
                {"path": "about", "name": "about"},
                {"path": "blog", "name": "blog"},
            ]},
        ]));
    }

    #[test]
    fn test_root_layout_wraps_root_index() {
        let tree = build(&["_layout", "about", "index"]);
        assert_eq!(shape(&tree.routes), json!([
            {"path": "/", "children": [
                {"path": "", "name": "home"},
                {"path": "about", "name": "about"},
            ]},
        ]));
        assert_eq!(
            tree.routes[0].component.as_ref().map(ComponentRef::identity),
            Some("/src/views/_layout.vue")
        );
        assert_eq!(
            tree.routes[0].children[0].component.as_ref().map(ComponentRef::identity),
            Some("/src/views/index.vue")
        );
        assert!(tree.warnings.is_empty());

        let alone = build(&["index", "_layout"]);
        assert_eq!(shape(&alone.routes), json!([
            {"path": "/", "children": [{"path": "", "name": "home"}]},
        ]));
    }

    #[test]
    fn test_leaf_beside_layout_directory_is_reported() {
        for order in [["users", "users/_layout", "users/[id]"], ["users/_layout", "users/[id]", "users"]] {
            let tree = build(&order);
            let at_users: Vec<_> = tree.routes.iter().filter(|r| r.path == "/users").collect();
            assert_eq!(at_users.len(), 2, "{order:?}");

            let layout = at_users.iter().find(|r| r.name.is_none()).unwrap();
            assert_eq!(
                layout.component.as_ref().map(ComponentRef::identity),
                Some("/src/views/users/_layout.vue")
            );
            assert_eq!(shape(&layout.children), json!([{"path": ":id", "name": "users-id"}]));

            assert_eq!(
                tree.warnings,
                vec![SynthesisWarning::LayoutShadowed {
                    path: "/users".into(),
                    layout: "/src/views/users/_layout.vue".into(),
                    leaf: "/src/views/users.vue".into(),
                }]
            );
        }
    }

    #[test]
    fn test_excluded_files_never_appear() {
        let tree = build(&["index", "components/Button", "components/_layout", "users/components/Avatar", "users/index"]);
        let mut paths = Vec::new();
        for route in &tree.routes {
            route.walk(&mut |r| {
                paths.push(r.path.clone());
                if let Some(c) = &r.component {
                    assert!(!c.identity().contains("/components/"), "{}", c.identity());
                }
            });
        }
        assert_eq!(paths, vec!["/", "/users"]);
    }

    #[test]
    fn test_files_outside_root_or_extension_are_ignored() {
        let mut input = files(&["about"]);
        input.push(DiscoveredFile::new("/src/pages/other.vue", true));
        input.push(DiscoveredFile::new("/src/views/notes.md", true));
        let tree = synthesize(
            &input,
            &RouteRules::default(),
            MetadataResolver::new(&ExternalMeta::new(), None),
        );
        assert_eq!(tree.routes.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let paths = ["index", "about", "users/_layout", "users/index", "users/[id]/index", "docs/[slug]"];
        let first = build(&paths);
        let second = build(&paths);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_segment_warns_and_passes_through() {
        let tree = build(&["posts/[a][b]"]);
        assert_eq!(tree.routes[0].path, "/posts/[a][b]");
        assert!(matches!(
            tree.warnings[0],
            SynthesisWarning::UnsupportedSegment { ref segment, .. } if segment == "[a][b]"
        ));
    }

    #[test]
    fn test_duplicate_layout_keeps_first() {
        let mut input = files(&["users/_layout", "users/index"]);
        input.insert(1, DiscoveredFile::new("/src/views/users/_layout.tsx", true));
        let rules = RouteRules {
            extensions: vec![".vue".into(), ".tsx".into()],
            ..RouteRules::default()
        };
        let tree = synthesize(&input, &rules, MetadataResolver::new(&ExternalMeta::new(), None));
        let users = tree.routes.iter().find(|r| r.path == "/users").unwrap();
        assert_eq!(
            users.component.as_ref().map(ComponentRef::identity),
            Some("/src/views/users/_layout.vue")
        );
        assert!(matches!(tree.warnings[0], SynthesisWarning::DuplicateLayout { .. }));
    }

    #[test]
    fn test_eager_components() {
        let input = vec![DiscoveredFile::new("/src/views/about.vue", false)];
        let tree = synthesize(
            &input,
            &RouteRules::default(),
            MetadataResolver::new(&ExternalMeta::new(), None),
        );
        assert!(matches!(tree.routes[0].component, Some(ComponentRef::Eager(_))));
    }

    #[test]
    fn test_meta_uses_fully_qualified_paths() {
        let meta = |v: serde_json::Value| -> Meta { v.as_object().cloned().unwrap() };
        let mut external = ExternalMeta::new();
        external.insert("/", meta(json!({"title": "Home"})));
        external.insert("/users", meta(json!({"title": "Users", "section": "people"})));
        external.insert("/users/:id", meta(json!({"title": "User"})));

        let mut embedded = EmbeddedMeta::new();
        embedded.insert("/src/views/users/index.vue", meta(json!({"title": "All users"})));

        let tree = synthesize(
            &files(&["index", "users/_layout", "users/index", "users/[id]/index"]),
            &RouteRules::default(),
            MetadataResolver::new(&external, Some(&embedded)),
        );

        assert_eq!(tree.routes[0].meta, meta(json!({"title": "Home"})));
        let users = &tree.routes[1];
        assert_eq!(users.meta, meta(json!({"title": "Users", "section": "people"})));
        // index child shares the layout path; embedded overrides, external-only keys survive
        assert_eq!(
            users.children[0].meta,
            meta(json!({"title": "All users", "section": "people"}))
        );
        assert_eq!(users.children[1].meta, meta(json!({"title": "User"})));
    }

    #[test]
    fn test_phases_can_run_individually() {
        let rules = RouteRules::default();
        let ctx = SynthesisContext::new(&rules).classify(&files(&["a/_layout", "a/b"]));
        assert_eq!(ctx.route_map.len(), 1);
        assert_eq!(ctx.layouts.len(), 1);

        let ctx = ctx.redirect_root().nest();
        assert!(ctx.route_map.is_empty());
        assert_eq!(ctx.routes.len(), 2);
        assert_eq!(ctx.routes[1].children[0].path, "b");
    }
}
