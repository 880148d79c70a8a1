//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Convention-based route generator: turns a views directory into a nested route tree
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: routegen.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "routegen.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Synthesize routes, write outputs and the type declaration
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        route_args: RouteArgs,

        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Print the synthesized route tree
    #[command(visible_alias = "i")]
    Inspect {
        #[command(flatten)]
        route_args: RouteArgs,
    },

    /// Watch the routes directory and emit hot update messages on stdout
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        route_args: RouteArgs,
    },

    /// Resolve a module id against the virtual routes module
    #[command(visible_alias = "r")]
    Resolve {
        /// Module id, e.g. `virtual:convention-routes`
        id: String,

        #[command(flatten)]
        route_args: RouteArgs,
    },
}

/// Route options shared by all commands; each overrides `routegen.toml`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RouteArgs {
    /// Routes directory (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<String>,

    /// Generate lazy component loaders
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub lazy: Option<bool>,

    /// External metadata file (.toml or .json)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub meta: Option<PathBuf>,

    /// Honor metadata embedded in components
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub embedded: Option<bool>,
}

/// Build-only options.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Emit the registration file with routes injected instead of route JSON
    #[arg(short, long)]
    pub inject: bool,

    /// Write the type declaration file
    #[arg(short = 'D', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub declaration: Option<bool>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

impl Cli {
    pub fn route_args(&self) -> &RouteArgs {
        match &self.command {
            Commands::Build { route_args, .. }
            | Commands::Inspect { route_args }
            | Commands::Watch { route_args }
            | Commands::Resolve { route_args, .. } => route_args,
        }
    }

    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Commands::Watch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_args() {
        let cli = Cli::parse_from(["routegen", "build", "--dir", "app/pages", "--lazy", "false", "-i"]);
        let Commands::Build { route_args, build_args } = &cli.command else {
            panic!("expected build");
        };
        assert_eq!(route_args.dir.as_deref(), Some("app/pages"));
        assert_eq!(route_args.lazy, Some(false));
        assert!(build_args.inject);
        assert_eq!(build_args.declaration, None);
    }

    #[test]
    fn test_flag_without_value_means_true() {
        let cli = Cli::parse_from(["routegen", "inspect", "--embedded"]);
        assert_eq!(cli.route_args().embedded, Some(true));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["routegen", "w", "-v", "-C", "other.toml"]);
        assert!(cli.is_watch());
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_resolve_id() {
        let cli = Cli::parse_from(["routegen", "resolve", "virtual:convention-routes"]);
        assert!(matches!(&cli.command, Commands::Resolve { id, .. } if id == "virtual:convention-routes"));
    }
}
