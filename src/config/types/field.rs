//! Config field addresses used in diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// A key inside a `routegen.toml` section, rendered as `section.key`.
///
/// Sections declare these next to their validation:
///
/// ```ignore
/// const LAYOUT: FieldPath = FieldPath::new("routes", "layout");
/// diag.error(Self::LAYOUT, "must be a file stem");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath {
    section: &'static str,
    key: &'static str,
}

impl FieldPath {
    pub const fn new(section: &'static str, key: &'static str) -> Self {
        Self { section, key }
    }

    pub const fn section(&self) -> &'static str {
        self.section
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dotted = format!("`{}.{}`", self.section, self.key);
        write!(f, "{}", dotted.bright_blue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let field = FieldPath::new("routes", "layout");
        assert_eq!(field.section(), "routes");
        assert_eq!(field.key(), "layout");
        assert!(field.to_string().contains("routes.layout"));
    }
}
