use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::commands::Command;
use crate::commands::SnavCommand;

/// The main CLI structure that defines the command-line interface.
#[derive(Parser)]
#[command(name = "snav")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SnavCommand,
}

/// Parse CLI arguments and execute the chosen command.
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    match cli.command {
        SnavCommand::Render(command) => command.execute(),
    }
}
