//! Run state and the synthesis pipeline shared by every command.

mod pipeline;
mod state;

pub use pipeline::Pipeline;
pub use state::{set_watching, setup_shutdown_handler, shutdown_requested};
