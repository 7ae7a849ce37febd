use std::process::ExitCode;

use clap::Parser;
use scanner_logging::{scanner_debug, scanner_error};

mod cli;
mod platform;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    platform::logging::initialize(cli.log_destination(), cli.log_level());
    scanner_debug!("Parsed command line: {:?}", cli);

    let settings = cli.settings();
    platform::app::run(cli.command, settings).inspect_err(|err| scanner_error!("{err:#}"))
}
