//! Project configuration for `routegen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── routes     # [routes]
//! │   ├── meta       # [meta]
//! │   ├── declaration# [declaration]
//! │   └── hmr        # [hmr]
//! ├── types/         # ConfigError, diagnostics, field paths
//! └── mod.rs         # RouteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                         |
//! |------------------|-------------------------------------------------|
//! | `[routes]`       | Routes dir, extensions, excludes, layout, lazy  |
//! | `[meta]`         | External metadata source, embedded toggle       |
//! | `[declaration]`  | Type declaration artifact                       |
//! | `[hmr]`          | Host module graph for hot updates               |
//!
//! Every field has a default, so a project without `routegen.toml` works
//! with the conventional layout rooted at the current directory.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, normalize_path};

pub use section::{DeclarationConfig, HmrConfig, MetaConfig, RoutesConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands, RouteArgs},
    log,
    route::RouteRules,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "routegen.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing routegen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Absolute path to the config file, which may not exist (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root: parent of the config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub verbose: bool,
    pub routes: RoutesConfig,
    pub meta: MetaConfig,
    pub declaration: DeclarationConfig,
    pub hmr: HmrConfig,
}

impl RouteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, defaults
    /// apply and the project root is cwd; an explicit `-C` that does not
    /// exist is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None if cli.config != Path::new(CONFIG_FILE) => {
                return Err(ConfigError::Io(
                    cli.config.clone(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                )
                .into());
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                Self {
                    config_path: cwd.join(CONFIG_FILE),
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.root = normalize_path(&config.root);
        config.apply_command_options(cli);
        crate::logger::set_verbose(cli.verbose || config.verbose);

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // derived paths
    // ========================================================================

    /// Join a path with the project root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute routes directory.
    pub fn routes_dir(&self) -> PathBuf {
        self.root_join(self.routes.dir.trim_matches('/'))
    }

    /// Absolute external metadata source, if configured.
    pub fn meta_source(&self) -> Option<PathBuf> {
        self.meta.source.as_ref().map(|p| self.root_join(p))
    }

    pub fn declaration_path(&self) -> PathBuf {
        self.root_join(&self.declaration.path)
    }

    pub fn registration_file(&self) -> PathBuf {
        self.root_join(self.routes.registration_file.trim_start_matches('/'))
    }

    pub fn graph_path(&self) -> PathBuf {
        self.root_join(&self.hmr.graph)
    }

    /// Path rules for the synthesis pass.
    pub fn rules(&self) -> RouteRules {
        RouteRules {
            root: format!("/{}", self.routes.dir.trim_matches('/')),
            extensions: self.routes.extensions.clone(),
            excludes: self.routes.excludes.clone(),
            layout_name: self.routes.layout.clone(),
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn apply_command_options(&mut self, cli: &Cli) {
        self.apply_route_args(cli.route_args());
        if let Commands::Build { build_args, .. } = &cli.command {
            self.apply_build_args(build_args);
        }
    }

    fn apply_route_args(&mut self, args: &RouteArgs) {
        Self::update_option(&mut self.routes.dir, args.dir.as_ref());
        Self::update_option(&mut self.routes.lazy, args.lazy.as_ref());
        Self::update_option(&mut self.meta.embedded, args.embedded.as_ref());
        if let Some(meta) = &args.meta {
            self.meta.source = Some(meta.clone());
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        Self::update_option(&mut self.declaration.enable, args.declaration.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collects errors from every section and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.routes.validate(&mut diag);
        self.meta.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> RouteConfig {
    let (parsed, ignored) = RouteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
