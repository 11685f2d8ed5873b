//! CLI command implementations
//!
//! Each command is implemented as a struct that can execute independently.

pub mod generate;
pub mod plan;

use clap::Subcommand;

use crate::cli::output::OutputFormat;
use crate::error::CodegenResult;

/// All available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate blocking Java sources for every service of a descriptor set
    #[command(visible_alias = "g")]
    Generate(generate::GenerateCommand),

    /// Show classification, dispatch table and entry points of services
    #[command(visible_alias = "p")]
    Plan(plan::PlanCommand),
}

impl Command {
    /// Execute the command with the specified output format
    ///
    /// # Errors
    ///
    /// Returns the error of the executed command.
    pub fn execute(self, format: OutputFormat) -> CodegenResult<()> {
        match self {
            Command::Generate(cmd) => cmd.execute(format),
            Command::Plan(cmd) => cmd.execute(format),
        }
    }
}
