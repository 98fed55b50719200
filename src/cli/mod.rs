pub mod build;
pub mod completions;
pub mod groups;

use clap::{Parser, Subcommand};

use crate::transform::DEBUG_TARGET;

/// csssprite - CSS image sprite generator
#[derive(Parser, Debug)]
#[command(name = "csssprite")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show info-level logs (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform stylesheets and emit sprite composites
    Build(build::BuildArgs),

    /// Show the sprite groups stylesheets would form
    Groups(groups::GroupsArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Default log filter when `RUST_LOG` is unset. The line enabled by the
/// `debug` option is always shown.
pub fn log_directives(verbose: bool) -> String {
    if verbose {
        "info".to_string()
    } else {
        format!("warn,{}=info", DEBUG_TARGET)
    }
}
