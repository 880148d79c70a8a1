//! Injection into the route-registration file.
//!
//! The registration file declares an empty route list that gets replaced by
//! the generated expression:
//!
//! ```text
//! const routes: RouteRecordRaw[] = []
//!                                  ^^ replaced
//! ```
//!
//! Only the first such declaration is touched; the rest of the file is left
//! byte-for-byte intact. Eager component imports are prepended.

use std::sync::LazyLock;

use regex::Regex;

use super::codegen::RenderedRoutes;

static ROUTES_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(const\s+routes\s*(?::\s*RouteRecordRaw\[\])?\s*=\s*)\[\s*\]")
        .expect("valid routes declaration regex")
});

/// Replace the empty `routes` array with the rendered tree.
///
/// Returns `None` when the file has no injection point.
pub fn inject(source: &str, rendered: &RenderedRoutes) -> Option<String> {
    let found = ROUTES_DECL.captures(source)?;
    let whole = found.get(0)?;
    let prefix = found.get(1)?;

    let mut code = String::with_capacity(source.len() + rendered.expression.len());
    for import in &rendered.imports {
        code.push_str(import);
        code.push('\n');
    }
    code.push_str(&source[..whole.start()]);
    code.push_str(prefix.as_str());
    code.push_str(&rendered.expression);
    code.push_str(&source[whole.end()..]);
    Some(code)
}
