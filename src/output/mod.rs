//! Everything a pass produces for the outside world.
//!
//! ```text
//! output/
//! ├── codegen.rs         # tree → JS array expression + eager imports
//! ├── inject.rs          # `const routes = []` substitution
//! ├── declaration.rs     # routes.d.ts artifact
//! ├── virtual_module.rs  # virtual:convention-routes
//! └── inspect.rs         # tree view, verbose summary
//! ```

pub mod codegen;
pub mod declaration;
pub mod inject;
pub mod inspect;
pub mod virtual_module;

pub use codegen::render;
pub use virtual_module::{RESOLVED_VIRTUAL_ID, VirtualRoutes};
