//! Human-readable colored output formatter
//!
//! Section headers per service, tree-style listings of the dispatch wiring,
//! colors disabled when stdout is not a terminal or `NO_COLOR` is set.

use colored::Colorize;
use std::io::{IsTerminal, Write};

use super::{FailureReport, GenerationReport, OutputFormatter, PlanReport};
use crate::codegen::plan::DispatchStrategy;
use crate::codegen::{ArtifactKind, EmissionPlan, InteractionSemantic};
use crate::error::CodegenResult;

/// Human-readable formatter with colored output
pub struct HumanFormatter {
    use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter
    #[must_use]
    pub fn new() -> Self {
        Self::with_color(std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none())
    }

    /// Create a formatter with colors forced on or off
    #[must_use]
    pub const fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn section_header(&self, title: &str) -> String {
        let rule = "─".repeat(title.chars().count());
        if self.use_color {
            format!("\n{}\n{}", title.bold().cyan(), rule)
        } else {
            format!("\n{title}\n{rule}")
        }
    }

    fn kv(&self, key: &str, value: &str) -> String {
        if self.use_color {
            format!("  {}: {}", key.bold(), value)
        } else {
            format!("  {key}: {value}")
        }
    }

    fn list_item(&self, text: &str, level: usize) -> String {
        let indent = "  ".repeat(level + 1);
        if self.use_color {
            format!("{indent}• {}", text.bright_white())
        } else {
            format!("{indent}• {text}")
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn write_plan(&self, plan: &EmissionPlan, writer: &mut dyn Write) -> CodegenResult<()> {
        writeln!(writer, "{}", self.section_header(&plan.service_name))?;
        writeln!(writer, "{}", self.kv("Service id", &plan.service_id))?;
        writeln!(
            writer,
            "{}",
            self.kv(
                "Methods",
                &format!(
                    "{} ({} one-way, {} unary, {} stream, {} channel)",
                    plan.summary.total(),
                    plan.summary.one_way,
                    plan.summary.unary,
                    plan.summary.server_stream,
                    plan.summary.channel
                )
            )
        )?;
        writeln!(
            writer,
            "{}",
            self.kv("Metrics", if plan.options.metrics { "on" } else { "off" })
        )?;

        writeln!(writer, "\n  {}", self.dimmed("Classification"))?;
        for task in plan.tasks_for(ArtifactKind::Interface) {
            writeln!(
                writer,
                "{}",
                self.list_item(&format!("{} → {}", task.method.name, task.semantic), 0)
            )?;
        }

        writeln!(writer, "\n  {}", self.dimmed("Entry points"))?;
        for entry in &plan.entry_points {
            let strategy = match entry.strategy {
                DispatchStrategy::RouteSwitch => "route switch",
                DispatchStrategy::DecodeThenDispatch => "decode then dispatch",
            };
            let state = if entry.is_implemented() {
                format!("{} route(s), {strategy}", entry.handlers.len())
            } else {
                self.dimmed("unimplemented")
            };
            writeln!(
                writer,
                "{}",
                self.list_item(&format!("{} ({state})", entry.name), 0)
            )?;
            for handler in &entry.handlers {
                writeln!(
                    writer,
                    "{}",
                    self.list_item(
                        &format!("{} → {}", handler.route_key, handler.handler_name),
                        1
                    )
                )?;
            }
        }
        Ok(())
    }

    fn write_failures(&self, failures: &[FailureReport], writer: &mut dyn Write) -> CodegenResult<()> {
        if failures.is_empty() {
            return Ok(());
        }
        writeln!(
            writer,
            "{}",
            self.section_header(&format!("Failed services ({})", failures.len()))
        )?;
        for failure in failures {
            let mark = if self.use_color {
                "✗".red().to_string()
            } else {
                "✗".to_string()
            };
            writeln!(
                writer,
                "  {mark} {} ({}) [{}]",
                failure.service, failure.file, failure.rule
            )?;
            writeln!(writer, "    {}", self.dimmed(&failure.message))?;
        }
        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for HumanFormatter {
    fn write_plans(&self, report: &PlanReport, writer: &mut dyn Write) -> CodegenResult<()> {
        for plan in &report.plans {
            self.write_plan(plan, writer)?;
        }
        self.write_failures(&report.failures, writer)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_generation(
        &self,
        report: &GenerationReport,
        writer: &mut dyn Write,
    ) -> CodegenResult<()> {
        let title = if report.dry_run {
            format!("Dry run, nothing written to {}", report.output.display())
        } else {
            format!("Generated into {}", report.output.display())
        };
        writeln!(writer, "{}", self.section_header(&title))?;

        for service in &report.generated {
            let mark = if self.use_color {
                "✓".green().to_string()
            } else {
                "✓".to_string()
            };
            writeln!(
                writer,
                "  {mark} {} ({} method(s))",
                service.service,
                service.summary.total()
            )?;
            for file in &service.files {
                writeln!(writer, "{}", self.list_item(&file.display().to_string(), 1))?;
            }
        }

        self.write_failures(&report.failures, writer)?;

        let active = InteractionSemantic::ALL
            .into_iter()
            .filter(|semantic| {
                report
                    .generated
                    .iter()
                    .any(|service| service.summary.count(*semantic) > 0)
            })
            .map(|semantic| semantic.interaction_name())
            .collect::<Vec<_>>();
        writeln!(writer)?;
        writeln!(
            writer,
            "{}",
            self.kv(
                "Summary",
                &format!(
                    "{} generated, {} failed{}",
                    report.generated.len(),
                    report.failures.len(),
                    if active.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", active.join(", "))
                    }
                )
            )
        )?;
        Ok(())
    }

    fn write_error(&self, error: &str, writer: &mut dyn Write) -> CodegenResult<()> {
        if self.use_color {
            writeln!(writer, "{}: {}", "Error".bold().red(), error)?;
        } else {
            writeln!(writer, "Error: {error}")?;
        }
        Ok(())
    }

    fn write_success(&self, message: &str, writer: &mut dyn Write) -> CodegenResult<()> {
        if self.use_color {
            writeln!(writer, "{} {}", "✓".green(), message)?;
        } else {
            writeln!(writer, "✓ {message}")?;
        }
        Ok(())
    }
}
