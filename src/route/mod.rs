//! Route tree synthesis.
//!
//! ```text
//! route/
//! ├── path.rs     # file path → route path (pure string rules)
//! ├── record.rs   # RouteRecord, ComponentRef, DiscoveredFile
//! ├── builder.rs  # two-pass tree builder over a SynthesisContext
//! └── names.rs    # duplicate route name policy
//! ```

pub mod builder;
mod names;
pub mod path;
mod record;

pub use builder::{RouteRules, RouteTree, synthesize};
pub use path::RoutePath;
pub use record::{ComponentRef, DiscoveredFile, Meta, RouteRecord};
