//! JSON output formatter
//!
//! Provides JSON output (compact or pretty-printed) for scripting
//! and programmatic consumption.

use serde::Serialize;
use std::io::Write;

use super::{GenerationReport, OutputFormatter, PlanReport};
use crate::error::CodegenResult;

/// JSON formatter (compact or pretty)
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    #[must_use]
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn emit(&self, value: &impl Serialize, writer: &mut dyn Write) -> CodegenResult<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn write_plans(&self, report: &PlanReport, writer: &mut dyn Write) -> CodegenResult<()> {
        self.emit(report, writer)
    }

    fn write_generation(
        &self,
        report: &GenerationReport,
        writer: &mut dyn Write,
    ) -> CodegenResult<()> {
        self.emit(report, writer)
    }

    fn write_error(&self, error: &str, writer: &mut dyn Write) -> CodegenResult<()> {
        self.emit(
            &serde_json::json!({
                "error": error,
                "success": false
            }),
            writer,
        )
    }

    fn write_success(&self, message: &str, writer: &mut dyn Write) -> CodegenResult<()> {
        self.emit(
            &serde_json::json!({
                "message": message,
                "success": true
            }),
            writer,
        )
    }
}
