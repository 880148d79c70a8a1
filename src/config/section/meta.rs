//! `[meta]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [meta]
//! source = "routes.meta.toml"   # External map of route path → metadata (.toml or .json)
//! embedded = true               # Honor `@meta` blocks / `export const meta` in components
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Project-relative; absolute after load.
    pub source: Option<std::path::PathBuf>,
    pub embedded: bool,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            source: None,
            embedded: true,
        }
    }
}

impl MetaConfig {
    const SOURCE: FieldPath = FieldPath::new("meta", "source");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(source) = &self.source else {
            return;
        };
        let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !matches!(ext, "toml" | "json") {
            diag.error_with_hint(
                Self::SOURCE,
                format!("unsupported metadata format `{}`", source.display()),
                "use a .toml or .json file",
            );
        }
    }
}
