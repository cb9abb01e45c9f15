mod render;

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

pub trait Command {
    fn execute(&self) -> Result<ExitCode>;
}

#[derive(Debug, Subcommand)]
pub enum SnavCommand {
    /// Build a navigation tree from a fixture and print it
    Render(self::render::Render),
}
