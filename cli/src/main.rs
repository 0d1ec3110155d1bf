mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{profile, trim};
use tracing_subscriber::EnvFilter;

/// Install the log subscriber; `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Trim(args) => trim::run(&cli, args),
        Commands::Profile(args) => profile::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
