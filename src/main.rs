use clap::Parser;
use gitrisk::cli::{Cli, Command};
use gitrisk::handlers::{handle_list, handle_scan};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "gitrisk=debug"
    } else {
        "gitrisk=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Scan {
            target,
            format,
            output,
        } => handle_scan(target, *format, output, cli.verbose),
        Command::List { target } => handle_list(target, cli.verbose),
    }
}
