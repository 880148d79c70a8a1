//! Hot update support for watch mode.
//!
//! ```text
//! hmr/
//! ├── watch/         # notify watcher, debouncer, route-file filter
//! ├── channel.rs     # JSON-lines HmrChannel for the CLI host
//! ├── graph.rs       # host importer graph + closure
//! ├── invalidate.rs  # closure invalidation, targeted update or full reload
//! └── message.rs     # JSON message protocol
//! ```

pub mod channel;
pub mod graph;
pub mod invalidate;
pub mod message;
pub mod watch;

pub use channel::JsonLinesChannel;
pub use graph::ImporterGraph;
pub use invalidate::{Invalidator, Outcome};
pub use watch::{ChangeSet, RouteWatcher, WatchFilter};
