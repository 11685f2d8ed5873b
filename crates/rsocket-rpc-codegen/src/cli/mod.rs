//! CLI Interface for rsocket-rpc-codegen
//!
//! - Type-safe argument parsing with clap v4
//! - Human and JSON output formats
//! - Colored output with TTY detection
//! - Proper exit codes
//!
//! ## Architecture
//!
//! ```text
//! cli/
//! ├── args.rs       # Shared argument types
//! ├── commands/     # Command implementations
//! ├── output/       # Output formatters
//! └── error.rs      # User-friendly error display
//! ```

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

use std::io::IsTerminal;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::CodegenResult;

/// rsocket-rpc-codegen - RSocket RPC service compiler
///
/// Generates blocking Java interfaces, clients and servers from service
/// descriptors.
#[derive(Parser, Debug)]
#[command(
    name = "rsocket-rpc-codegen",
    version,
    about = "RSocket RPC service compiler - blocking Java stubs from service descriptors",
    author
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: commands::Command,

    /// Enable verbose logging (-v, -vv, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human", global = true)]
    pub format: output::OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if command execution fails.
    pub fn execute(self) -> CodegenResult<()> {
        self.init_tracing();

        if self.no_color || !std::io::stdout().is_terminal() {
            colored::control::set_override(false);
        }

        self.command.execute(self.format)
    }

    /// Log level selected by the verbosity flags
    #[must_use]
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }

    /// Initialize tracing subscriber, `RUST_LOG` wins over the flags
    fn init_tracing(&self) {
        let builder = tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr);

        // try_init: a subscriber may already be installed when embedded
        let _ = match EnvFilter::try_from_default_env() {
            Ok(filter) => builder.with_env_filter(filter).try_init(),
            Err(_) => builder.with_max_level(self.log_level()).try_init(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "rsocket-rpc-codegen",
            "generate",
            "-d",
            "services.json",
            "-o",
            "out",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["rsocket-rpc-codegen", "-vvv", "plan", "-d", "s.json"])
            .unwrap();
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), Level::TRACE);

        let cli = Cli::try_parse_from(["rsocket-rpc-codegen", "plan", "-d", "s.json"]).unwrap();
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let cli = Cli::try_parse_from([
            "rsocket-rpc-codegen",
            "-v",
            "--quiet",
            "plan",
            "-d",
            "s.json",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rsocket-rpc-codegen",
            "plan",
            "-d",
            "s.json",
            "-f",
            "json-pretty",
        ])
        .unwrap();
        assert_eq!(cli.format, output::OutputFormat::JsonPretty);
    }
}
