//! Human-readable views of a route tree.

use std::fmt::Write;

use serde_json::Value;

use crate::route::{RoutePath, RouteRecord};

/// Indented tree, one record per line:
///
/// ```text
/// /               home      /src/views/index.vue
/// /users          (layout)  /src/views/users/_layout.vue
///   ""            users     /src/views/users/index.vue
///   :id           users-id  /src/views/users/[id]/index.vue
/// ```
pub fn render_tree(routes: &[RouteRecord]) -> String {
    let mut rows = Vec::new();
    for route in routes {
        collect_rows(route, 0, &mut rows);
    }

    // format! pads by char, so measure the same way
    let path_width = rows.iter().map(|r| r.path.chars().count()).max().unwrap_or(0);
    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:path_width$}  {:name_width$}  {}{}",
            row.path, row.name, row.target, row.meta,
        );
    }
    out
}

struct Row {
    path: String,
    name: String,
    target: String,
    meta: String,
}

fn collect_rows(record: &RouteRecord, depth: usize, rows: &mut Vec<Row>) {
    let shown = if record.path.is_empty() { "\"\"" } else { &record.path };
    let name = match (&record.name, record.is_redirect()) {
        (Some(name), _) => name.clone(),
        (None, true) => "(redirect)".to_string(),
        (None, false) => "(layout)".to_string(),
    };
    let target = match (&record.redirect, &record.component) {
        (Some(to), _) => format!("→ {to}"),
        (None, Some(component)) => component.identity().to_string(),
        (None, None) => "(no component)".to_string(),
    };
    let meta = if record.meta.is_empty() {
        String::new()
    } else {
        format!("  {}", Value::Object(record.meta.clone()))
    };

    rows.push(Row {
        path: format!("{}{}", "  ".repeat(depth), shown),
        name,
        target,
        meta,
    });
    for child in &record.children {
        collect_rows(child, depth + 1, rows);
    }
}

/// Pretty JSON with loaders replaced by `() => Component`, for verbose logs.
pub fn debug_summary(routes: &[RouteRecord]) -> String {
    let mut value = serde_json::to_value(routes).unwrap_or(Value::Null);
    mask_components(&mut value);
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Only the record-level `component` field; user metadata keeps its keys.
fn mask_components(records: &mut Value) {
    let Value::Array(items) = records else {
        return;
    };
    for item in items {
        let Value::Object(record) = item else {
            continue;
        };
        if let Some(component) = record.get_mut("component") {
            *component = Value::String("() => Component".into());
        }
        if let Some(children) = record.get_mut("children") {
            mask_components(children);
        }
    }
}

/// Total records and the number of distinct full paths.
pub fn count_summary(routes: &[RouteRecord]) -> (usize, usize) {
    let mut records = 0;
    let mut paths = rustc_hash::FxHashSet::default();
    fn visit(
        record: &RouteRecord,
        base: Option<&RoutePath>,
        records: &mut usize,
        paths: &mut rustc_hash::FxHashSet<String>,
    ) {
        let full = base.map_or_else(|| RoutePath::from_relative(&record.path), |b| b.join(&record.path));
        *records += 1;
        paths.insert(full.as_str().to_string());
        for child in &record.children {
            visit(child, Some(&full), records, paths);
        }
    }
    for route in routes {
        visit(route, None, &mut records, &mut paths);
    }
    (records, paths.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ComponentRef;

    fn sample() -> Vec<RouteRecord> {
        let mut users = RouteRecord::layout("/users", ComponentRef::new("/v/users/_layout.vue", true));
        users
            .children
            .push(RouteRecord::leaf("", "users", ComponentRef::new("/v/users/index.vue", true)));
        users
            .children
            .push(RouteRecord::leaf(":id", "users-id", ComponentRef::new("/v/users/[id].vue", false)));
        vec![RouteRecord::redirect("/", "/users"), users]
    }

    #[test]
    fn test_render_tree() {
        let out = render_tree(&sample());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('/'));
        assert!(lines[0].contains("(redirect)"));
        assert!(lines[0].contains("→ /users"));
        assert!(lines[1].contains("(layout)"));
        assert!(lines[2].starts_with("  \"\""));
        assert!(lines[3].starts_with("  :id"));
        assert!(lines[3].contains("/v/users/[id].vue"));
    }

    #[test]
    fn test_debug_summary_masks_components() {
        let summary = debug_summary(&sample());
        assert!(summary.contains("\"component\": \"() => Component\""));
        assert!(!summary.contains("/v/users/index.vue"));
        assert!(summary.contains("\"redirect\": \"/users\""));
    }

    #[test]
    fn test_render_tree_aligns_non_ascii_paths() {
        let routes = vec![
            RouteRecord::leaf("/关于", "about-zh", ComponentRef::new("/v/关于.vue", true)),
            RouteRecord::leaf("/a", "a", ComponentRef::new("/v/a.vue", true)),
        ];
        let out = render_tree(&routes);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "/关于  about-zh  /v/关于.vue");
        assert_eq!(lines[1], "/a   a         /v/a.vue");
    }

    #[test]
    fn test_debug_summary_keeps_meta_named_component() {
        let mut about = RouteRecord::leaf("/about", "about", ComponentRef::new("/v/about.vue", true));
        about.meta.insert("component".into(), serde_json::json!("AboutCard"));
        let mut users = RouteRecord::layout("/users", ComponentRef::new("/v/users/_layout.vue", true));
        users.children.push(about);

        let summary: Value = serde_json::from_str(&debug_summary(&[users])).unwrap();
        assert_eq!(summary[0]["component"], "() => Component");
        let child = &summary[0]["children"][0];
        assert_eq!(child["component"], "() => Component");
        assert_eq!(child["meta"]["component"], "AboutCard");
    }

    #[test]
    fn test_count_summary() {
        assert_eq!(count_summary(&sample()), (4, 3));
    }
}
