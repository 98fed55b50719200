use clap::Parser;
use csssprite::cli::{Cli, Commands};
use csssprite::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => csssprite::cli::build::run(args, &printer)?,
        Commands::Groups(args) => csssprite::cli::groups::run(args, &printer)?,
        Commands::Completions(args) => csssprite::cli::completions::run(args)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(csssprite::cli::log_directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
