//! File path → route path normalization.
//!
//! Pure functions, no I/O. A discovered file goes through:
//!
//! ```text
//! /src/views/users/[id]/index.vue
//!   strip root + extension  → users/[id]/index
//!   classify                → Leaf { key: "users/[id]/index" }
//!   dynamic segments        → users/:id/index
//!   trailing index          → users/:id
//!   route path              → /users/:id
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A single `[name]` path element.
static DYNAMIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\w+)\]$").expect("valid dynamic segment regex"));

const INDEX: &str = "index";

// ============================================================================
// RoutePath
// ============================================================================

/// Normalized, absolute route path (`/users/:id`).
///
/// Never ends with `/index`; the empty path is represented as `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    /// The application root `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Build from a path relative to the routes root (`users/:id`).
    pub fn from_relative(relative: &str) -> Self {
        let trimmed = relative.trim_matches('/');
        if trimmed.is_empty() {
            Self::root()
        } else {
            Self(format!("/{trimmed}"))
        }
    }

    /// Join a child path onto a layout path.
    ///
    /// The root layout collapses (`/` + `about` → `/about`) and an empty
    /// child resolves to the layout itself.
    pub fn join(&self, child: &str) -> Self {
        if child.is_empty() {
            return self.clone();
        }
        if self.is_root() {
            return Self::from_relative(child);
        }
        Self(format!("{}/{}", self.0, child.trim_start_matches('/')))
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Classification
// ============================================================================

/// What a file under the routes root turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind<'a> {
    /// `index` directly under the routes root.
    RootIndex,
    /// `<dir>/_layout`; `dir` is empty for a root layout.
    Layout { dir: &'a str },
    /// Any other route-producing file, keyed by its raw relative path.
    Leaf { key: &'a str },
}

/// Classify a root- and extension-stripped path.
///
/// Layout files are intercepted here, before any dynamic-segment or index
/// rewriting touches them.
pub fn classify<'a>(relative: &'a str, layout_name: &str) -> FileKind<'a> {
    if relative == INDEX {
        return FileKind::RootIndex;
    }
    if relative == layout_name {
        return FileKind::Layout { dir: "" };
    }
    match relative.strip_suffix(layout_name) {
        Some(dir) if dir.ends_with('/') => FileKind::Layout {
            dir: &dir[..dir.len() - 1],
        },
        _ => FileKind::Leaf { key: relative },
    }
}

/// Strip the routes root prefix and a matching extension from a raw path.
///
/// Returns `None` when the path is outside the root or has none of the
/// accepted extensions.
pub fn strip_root<'a>(raw: &'a str, root: &str, extensions: &[String]) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    let relative = raw.strip_prefix(root)?.strip_prefix('/')?;
    extensions
        .iter()
        .find_map(|ext| relative.strip_suffix(ext.as_str()))
        .filter(|stem| !stem.is_empty())
}

/// Whether a relative path lives under an excluded directory.
///
/// Matching is per path element, never by substring: `components` excludes
/// `components/button` but not `my-components/button`. A root-level file
/// whose stem equals an excluded name is dropped as well.
pub fn is_excluded(relative: &str, excludes: &[String]) -> bool {
    let mut elements: Vec<&str> = relative.split('/').collect();
    if elements.len() > 1 {
        elements.pop();
    }
    elements
        .iter()
        .any(|element| excludes.iter().any(|ex| ex == element))
}

// ============================================================================
// Segment rewriting
// ============================================================================

/// Replace every `[name]` element with `:name`.
///
/// Elements that contain brackets but are not a single `[name]` are kept
/// literally; see [`unsupported_segment`].
pub fn convert_dynamic(relative: &str) -> Cow<'_, str> {
    if !relative.contains('[') {
        return Cow::Borrowed(relative);
    }

    let converted: Vec<Cow<'_, str>> = relative
        .split('/')
        .map(|element| match DYNAMIC_SEGMENT.captures(element) {
            Some(caps) => Cow::Owned(format!(":{}", &caps[1])),
            None => Cow::Borrowed(element),
        })
        .collect();
    Cow::Owned(converted.join("/"))
}

/// First path element that uses brackets in an unsupported way
/// (`[a][b]`, `post-[id]`, `[[id]]`).
pub fn unsupported_segment(relative: &str) -> Option<&str> {
    relative.split('/').find(|element| {
        (element.contains('[') || element.contains(']')) && !DYNAMIC_SEGMENT.is_match(element)
    })
}

/// Drop a trailing `index` element: `users/index` → `users`, `index` → ``.
pub fn strip_trailing_index(relative: &str) -> &str {
    if relative == INDEX {
        return "";
    }
    relative
        .strip_suffix(INDEX)
        .and_then(|rest| rest.strip_suffix('/'))
        .unwrap_or(relative)
}

/// Full leaf rewrite, relative form (`users/[id]/index` → `users/:id`).
pub fn normalize_relative(key: &str) -> String {
    let converted = convert_dynamic(key);
    strip_trailing_index(&converted).to_string()
}

/// Route name from a relative route path.
///
/// `/` becomes `-`, `:` is dropped, stray dashes are trimmed, and the empty
/// name falls back to `home`.
pub fn derive_name(relative: &str) -> String {
    let name = relative.replace('/', "-").replace(':', "");
    let name = name.trim_matches('-');
    if name.is_empty() {
        "home".to_string()
    } else {
        name.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
