//! Output formatters for different formats
//!
//! A trait-based output system: the human formatter prints colored,
//! tree-style reports, the JSON formatters emit the same reports for
//! scripting.

pub mod human;
pub mod json;

use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::codegen::EmissionPlan;
use crate::codegen::plan::PlanSummary;
use crate::error::{CodegenError, CodegenResult};

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output (default)
    Human,
    /// JSON format (for scripting)
    Json,
    /// JSON with pretty-printing
    JsonPretty,
}

/// A service that could not be handled
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// Schema file declaring the service
    pub file: String,
    /// Service name
    pub service: String,
    /// Violated rule, see [`CodegenError::rule`]
    pub rule: &'static str,
    /// Error message
    pub message: String,
}

impl FailureReport {
    /// Build a report entry from an error
    #[must_use]
    pub fn new(file: &str, service: &str, error: &CodegenError) -> Self {
        Self {
            file: file.to_string(),
            service: service.to_string(),
            rule: error.rule(),
            message: error.to_string(),
        }
    }
}

/// Result of the `plan` command
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanReport {
    /// Plans of the services that could be planned
    pub plans: Vec<EmissionPlan>,
    /// Services that could not
    pub failures: Vec<FailureReport>,
}

/// One generated service
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    /// Service name
    pub service: String,
    /// Qualified service identifier
    pub service_id: String,
    /// Methods per semantic
    pub summary: PlanSummary,
    /// Files written, or that would be written on a dry run
    pub files: Vec<PathBuf>,
}

/// Result of the `generate` command
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Output directory
    pub output: PathBuf,
    /// Nothing was written
    pub dry_run: bool,
    /// Generated services
    pub generated: Vec<GeneratedReport>,
    /// Failed services
    pub failures: Vec<FailureReport>,
}

/// Trait for formatting and outputting command results
pub trait OutputFormatter {
    /// Format and write emission plans
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if writing to the output fails.
    fn write_plans(&self, report: &PlanReport, writer: &mut dyn Write) -> CodegenResult<()>;

    /// Format and write a generation report
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if writing to the output fails.
    fn write_generation(
        &self,
        report: &GenerationReport,
        writer: &mut dyn Write,
    ) -> CodegenResult<()>;

    /// Format and write an error message
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if writing to the output fails.
    fn write_error(&self, error: &str, writer: &mut dyn Write) -> CodegenResult<()>;

    /// Format and write a success message
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if writing to the output fails.
    fn write_success(&self, message: &str, writer: &mut dyn Write) -> CodegenResult<()>;
}

/// Factory function to create the appropriate formatter
#[must_use]
pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Human => Box::new(human::HumanFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::new(false)),
        OutputFormat::JsonPretty => Box::new(json::JsonFormatter::new(true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let _formatter = get_formatter(OutputFormat::Human);
        let _formatter = get_formatter(OutputFormat::Json);
        let _formatter = get_formatter(OutputFormat::JsonPretty);
    }

    #[test]
    fn test_failure_report_carries_rule() {
        let error = CodegenError::duplicate_route("Svc", "Svc.METHOD_A", "a", "A");
        let report = FailureReport::new("svc.proto", "Svc", &error);
        assert_eq!(report.rule, "DuplicateRoute");
        assert!(report.message.contains("Svc.METHOD_A"));
    }
}
