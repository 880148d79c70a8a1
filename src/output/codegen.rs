//! Route tree → JavaScript expression.
//!
//! The tree is emitted as an array literal. Strings and metadata go through
//! `serde_json`, so every value is a valid JS literal. Components become
//! loaders:
//!
//! ```text
//! Lazy("/src/views/about.vue")  →  () => import("/src/views/about.vue")
//! Eager("/src/views/about.vue") →  __route_0   (plus an import statement)
//! ```

use std::fmt::Write;

use rustc_hash::FxHashMap;

use crate::route::{ComponentRef, RouteRecord};

const INDENT: &str = "  ";

/// Generated code for one route tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderedRoutes {
    /// `import __route_N from "..."` lines for eager components.
    pub imports: Vec<String>,
    /// Array literal of route records.
    pub expression: String,
}

impl RenderedRoutes {
    /// Standalone ES module exporting the routes.
    pub fn to_module(&self) -> String {
        let mut code = String::new();
        for import in &self.imports {
            code.push_str(import);
            code.push('\n');
        }
        if !self.imports.is_empty() {
            code.push('\n');
        }
        code.push_str("export default ");
        code.push_str(&self.expression);
        code.push_str(";\n");
        code
    }
}

/// Render `routes` as a JS array expression.
pub fn render(routes: &[RouteRecord]) -> RenderedRoutes {
    let mut renderer = Renderer::default();
    let mut expression = String::new();
    renderer.write_list(&mut expression, routes, 0);
    RenderedRoutes {
        imports: renderer.imports,
        expression,
    }
}

#[derive(Default)]
struct Renderer {
    imports: Vec<String>,
    /// identity → binding, so shared layouts import once
    bindings: FxHashMap<String, String>,
}

impl Renderer {
    fn write_list(&mut self, out: &mut String, routes: &[RouteRecord], depth: usize) {
        if routes.is_empty() {
            out.push_str("[]");
            return;
        }
        out.push_str("[\n");
        for route in routes {
            push_indent(out, depth + 1);
            self.write_record(out, route, depth + 1);
            out.push_str(",\n");
        }
        push_indent(out, depth);
        out.push(']');
    }

    fn write_record(&mut self, out: &mut String, route: &RouteRecord, depth: usize) {
        let mut fields: Vec<String> = vec![format!("path: {}", literal(&route.path))];

        if let Some(name) = &route.name {
            fields.push(format!("name: {}", literal(name)));
        }
        if let Some(redirect) = &route.redirect {
            fields.push(format!("redirect: {}", literal(redirect)));
        }
        if let Some(component) = &route.component {
            let loader = self.loader(component);
            fields.push(format!("component: {loader}"));
        }
        if !route.meta.is_empty() {
            let meta = serde_json::to_string(&route.meta).unwrap_or_else(|_| "{}".into());
            fields.push(format!("meta: {meta}"));
        }
        if !route.children.is_empty() {
            let mut children = String::new();
            self.write_list(&mut children, &route.children, depth + 1);
            fields.push(format!("children: {children}"));
        }

        out.push_str("{\n");
        for field in fields {
            push_indent(out, depth + 1);
            out.push_str(&field);
            out.push_str(",\n");
        }
        push_indent(out, depth);
        out.push('}');
    }

    fn loader(&mut self, component: &ComponentRef) -> String {
        match component {
            ComponentRef::Lazy(identity) => format!("() => import({})", literal(identity)),
            ComponentRef::Eager(identity) => {
                if let Some(binding) = self.bindings.get(identity) {
                    return binding.clone();
                }
                let binding = format!("__route_{}", self.bindings.len());
                let mut import = String::new();
                let _ = write!(import, "import {binding} from {};", literal(identity));
                self.imports.push(import);
                self.bindings.insert(identity.clone(), binding.clone());
                binding
            }
        }
    }
}

fn literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into())
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lazy(path: &str, name: &str, file: &str) -> RouteRecord {
        RouteRecord::leaf(path, name, ComponentRef::new(file, true))
    }

    #[test]
    fn test_empty_tree() {
        let rendered = render(&[]);
        assert_eq!(rendered.expression, "[]");
        assert_eq!(rendered.to_module(), "export default [];\n");
    }

    #[test]
    fn test_lazy_leaf() {
        let rendered = render(&[lazy("/about", "about", "/src/views/about.vue")]);
        assert!(rendered.imports.is_empty());
        assert_eq!(
            rendered.expression,
            "[\n  {\n    path: \"/about\",\n    name: \"about\",\n    component: () => import(\"/src/views/about.vue\"),\n  },\n]"
        );
    }

    #[test]
    fn test_eager_imports_shared() {
        let layout = ComponentRef::new("/src/views/users/_layout.vue", false);
        let mut users = RouteRecord::layout("/users", layout.clone());
        users
            .children
            .push(RouteRecord::leaf("", "users", ComponentRef::new("/src/views/users/index.vue", false)));
        let again = RouteRecord::layout("/members", layout);

        let rendered = render(&[users, again]);
        assert_eq!(
            rendered.imports,
            vec![
                "import __route_0 from \"/src/views/users/_layout.vue\";",
                "import __route_1 from \"/src/views/users/index.vue\";",
            ]
        );
        assert_eq!(rendered.expression.matches("component: __route_0").count(), 2);
        assert!(rendered.expression.contains("children: ["));
        assert!(rendered.to_module().starts_with("import __route_0"));
    }

    #[test]
    fn test_redirect_and_meta() {
        let mut about = lazy("/about", "about", "/src/views/about.vue");
        about.meta.insert("title".into(), json!("About \"us\""));
        let rendered = render(&[RouteRecord::redirect("/", "/users"), about]);

        assert!(rendered.expression.contains("redirect: \"/users\""));
        assert!(rendered.expression.contains(r#"meta: {"title":"About \"us\""}"#));
        // redirect records carry no component
        let redirect_block = rendered.expression.split("},").next().unwrap();
        assert!(!redirect_block.contains("component"));
    }
}
