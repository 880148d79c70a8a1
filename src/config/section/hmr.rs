//! `[hmr]` section configuration.
//!
//! ```toml
//! [hmr]
//! graph = ".routegen/modules.json"   # Host module graph: module → importers
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HmrConfig {
    /// Re-read before every invalidation round.
    pub graph: PathBuf,
}

impl Default for HmrConfig {
    fn default() -> Self {
        Self {
            graph: PathBuf::from(".routegen/modules.json"),
        }
    }
}
