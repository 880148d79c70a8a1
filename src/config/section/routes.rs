//! `[routes]` section configuration.
//!
//! Where route components live and how file names become routes.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! dir = "src/views"                        # Routes directory (project-relative)
//! extensions = [".vue"]                    # Accepted component extensions
//! excludes = ["components"]                # Directory names never routed
//! layout = "_layout"                       # Layout sentinel file stem
//! lazy = true                              # Lazy component loaders
//! registration = ["/src/router/index.ts"]  # Modules that register the routes
//! registration_file = "src/router/index.ts"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub dir: String,
    pub extensions: Vec<String>,
    pub excludes: Vec<String>,
    /// Layout sentinel, without extension.
    pub layout: String,
    pub lazy: bool,
    /// Module identities that register the generated routes.
    /// Seeds for hot update invalidation.
    pub registration: Vec<String>,
    /// File holding the `const routes = []` injection point.
    pub registration_file: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            dir: "src/views".into(),
            extensions: vec![".vue".into()],
            excludes: vec!["components".into()],
            layout: "_layout".into(),
            lazy: true,
            registration: vec!["/src/router/index.ts".into()],
            registration_file: "src/router/index.ts".into(),
        }
    }
}

impl RoutesConfig {
    const EXTENSIONS: FieldPath = FieldPath::new("routes", "extensions");
    const LAYOUT: FieldPath = FieldPath::new("routes", "layout");
    const DIR: FieldPath = FieldPath::new("routes", "dir");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error_with_hint(
                Self::EXTENSIONS,
                "no extensions configured, nothing would be routed",
                "e.g. extensions = [\".vue\"]",
            );
        }
        for ext in &self.extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                diag.error_with_hint(
                    Self::EXTENSIONS,
                    format!("extension `{ext}` must start with a dot"),
                    format!("use \".{}\"", ext.trim_start_matches('.')),
                );
            }
        }
        if self.layout.is_empty() || self.layout.contains('/') {
            diag.error(
                Self::LAYOUT,
                format!("layout name `{}` must be a single non-empty file stem", self.layout),
            );
        }
        if self.dir.trim_matches('/').is_empty() {
            diag.error(Self::DIR, "routes directory must not be the project root");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_routes_config() {
        let config = test_parse_config(
            "[routes]\ndir = \"app/pages\"\nextensions = [\".vue\", \".tsx\"]\nlazy = false",
        );
        assert_eq!(config.routes.dir, "app/pages");
        assert_eq!(config.routes.extensions, vec![".vue", ".tsx"]);
        assert!(!config.routes.lazy);
        // untouched fields keep their defaults
        assert_eq!(config.routes.layout, "_layout");
        assert_eq!(config.routes.excludes, vec!["components"]);
    }

    #[test]
    fn test_routes_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.routes.dir, "src/views");
        assert_eq!(config.routes.extensions, vec![".vue"]);
        assert!(config.routes.lazy);
        assert_eq!(config.routes.registration_file, "src/router/index.ts");
    }

    #[test]
    fn test_routes_validate_ok() {
        let mut diag = ConfigDiagnostics::new();
        RoutesConfig::default().validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_routes_validate_collects_all() {
        let routes = RoutesConfig {
            extensions: vec!["vue".into(), ".".into()],
            layout: "layouts/_layout".into(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        routes.validate(&mut diag);
        assert_eq!(diag.len(), 3);
        assert_eq!(diag.errors()[0].field, RoutesConfig::EXTENSIONS);
        assert_eq!(diag.errors()[2].field, RoutesConfig::LAYOUT);
    }

    #[test]
    fn test_routes_validate_empty_extensions() {
        let routes = RoutesConfig {
            extensions: vec![],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        routes.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].hint.is_some());
    }
}
