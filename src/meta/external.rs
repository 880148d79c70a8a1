//! External metadata source: a file mapping route paths to metadata tables.
//!
//! ```toml
//! ["/users"]
//! title = "Users"
//! roles = ["admin"]
//!
//! ["/users/:id"]
//! title = "User detail"
//! ```
//!
//! JSON (`{"/users": {"title": "Users"}}`) is accepted when the file ends in
//! `.json`. Loading is best-effort: a missing or unparsable file yields an
//! empty source and a debug line, never an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::route::Meta;

#[derive(Debug, Error)]
pub enum ExternalMetaError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML metadata source")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON metadata source")]
    Json(#[from] serde_json::Error),
}

/// Route path → metadata, keyed by exact route path.
#[derive(Debug, Clone, Default)]
pub struct ExternalMeta(FxHashMap<String, Meta>);

impl ExternalMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-effort load; any failure yields an empty source.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(meta) if meta.is_empty() => {
                crate::debug!("meta"; "{} has no route entries", path.display());
                meta
            }
            Ok(meta) => {
                crate::debug!("meta"; "loaded {} route entries from {}", meta.len(), path.display());
                meta
            }
            Err(e) => {
                crate::debug!("meta"; "metadata source unavailable: {}", e);
                Self::new()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ExternalMetaError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExternalMetaError::Io(path.to_path_buf(), e))?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ExternalMetaError> {
        Ok(Self(toml::from_str(content)?))
    }

    pub fn from_json(content: &str) -> Result<Self, ExternalMetaError> {
        Ok(Self(serde_json::from_str(content)?))
    }

    #[cfg(test)]
    pub fn insert(&mut self, path: impl Into<String>, meta: Meta) {
        self.0.insert(path.into(), meta);
    }

    #[inline]
    pub fn get(&self, route_path: &str) -> Option<&Meta> {
        self.0.get(route_path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Async store
// ============================================================================

/// Latest loaded external metadata.
///
/// The load runs independently of synthesis; a pass that starts before it
/// finishes reads the empty initial value.
#[derive(Debug)]
pub struct MetaStore {
    current: ArcSwap<ExternalMeta>,
}

impl Default for MetaStore {
    fn default() -> Self {
        Self {
            current: ArcSwap::from_pointee(ExternalMeta::new()),
        }
    }
}

impl MetaStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current snapshot.
    #[inline]
    pub fn snapshot(&self) -> Arc<ExternalMeta> {
        self.current.load_full()
    }

    pub fn replace(&self, meta: ExternalMeta) {
        self.current.store(Arc::new(meta));
    }

    /// Load `path` on the blocking pool and publish the result when done.
    pub fn spawn_load(self: &Arc<Self>, path: PathBuf) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::task::spawn_blocking(move || store.replace(ExternalMeta::load(&path)))
    }
}
