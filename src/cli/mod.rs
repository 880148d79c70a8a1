//! Command-line interface module.

mod args;
pub mod build;
pub mod inspect;
pub mod resolve;
pub mod watch;

pub use args::{BuildArgs, Cli, Commands, RouteArgs};
