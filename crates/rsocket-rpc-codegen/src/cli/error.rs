//! User-friendly error formatting for CLI
//!
//! Converts errors into human-readable messages with a suggestion.

use colored::Colorize;

use crate::error::CodegenError;

fn headline_with_suggestion(headline: &str, detail: &str, suggestion: &str) -> String {
    format!(
        "{} {}\n  {}\n\n{}\n  {}",
        "✗".red().bold(),
        headline,
        detail,
        "Suggestion:".yellow(),
        suggestion
    )
}

/// Format an error for CLI display
#[must_use]
pub fn format_error(error: &CodegenError) -> String {
    match error {
        CodegenError::InvalidIdentifier { .. } => headline_with_suggestion(
            "Invalid identifier",
            &error.to_string(),
            "Method and service names must be non-empty ASCII identifiers",
        ),
        CodegenError::DuplicateRoute { .. } => headline_with_suggestion(
            "Duplicate route",
            &error.to_string(),
            "Rename one of the methods; names differing only in case or underscores collide",
        ),
        CodegenError::Template { message, .. } => headline_with_suggestion(
            "Template error",
            message,
            "Check the template overrides and the symbol table of the configuration",
        ),
        CodegenError::Configuration { message, .. } => headline_with_suggestion(
            "Configuration error",
            message,
            "Run with --help to see all available options",
        ),
        CodegenError::Serialization(err) => headline_with_suggestion(
            "JSON parsing error",
            &err.to_string(),
            "The descriptor set must be the JSON emitted by the schema front end",
        ),
        CodegenError::Io(err) => headline_with_suggestion(
            "I/O error",
            &err.to_string(),
            "Check file paths, permissions and disk space",
        ),
    }
}

/// Display an error to stderr and return exit code
#[must_use]
pub fn display_error(error: &CodegenError) -> i32 {
    eprintln!("{}", format_error(error));
    1
}
