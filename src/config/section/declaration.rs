//! `[declaration]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [declaration]
//! enable = true
//! path = "src/router/routes.d.ts"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationConfig {
    pub enable: bool,
    pub path: PathBuf,
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: PathBuf::from("src/router/routes.d.ts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_declaration_config() {
        let config = test_parse_config("[declaration]\nenable = false\npath = \"types/routes.d.ts\"");
        assert!(!config.declaration.enable);
        assert_eq!(config.declaration.path, std::path::Path::new("types/routes.d.ts"));
    }

    #[test]
    fn test_declaration_config_defaults() {
        let config = test_parse_config("");
        assert!(config.declaration.enable);
        assert_eq!(config.declaration.path, std::path::Path::new("src/router/routes.d.ts"));
    }
}
