//! Configuration section definitions.
//!
//! Each module corresponds to a section in `routegen.toml`:
//!
//! | Module        | TOML Section     | Purpose                                  |
//! |---------------|------------------|------------------------------------------|
//! | `routes`      | `[routes]`       | Routes dir, extensions, layout, loaders  |
//! | `meta`        | `[meta]`         | External / embedded route metadata       |
//! | `declaration` | `[declaration]`  | Type declaration artifact                |
//! | `hmr`         | `[hmr]`          | Host module graph for hot updates        |

mod declaration;
mod hmr;
mod meta;
mod routes;

pub use declaration::DeclarationConfig;
pub use hmr::HmrConfig;
pub use meta::MetaConfig;
pub use routes::RoutesConfig;
