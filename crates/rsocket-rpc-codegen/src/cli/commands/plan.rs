//! Plan command implementation
//!
//! Runs services through the planning core only and prints the result.

use clap::Args;

use crate::cli::args::DescriptorArgs;
use crate::cli::output::{FailureReport, OutputFormat, PlanReport, get_formatter};
use crate::codegen::{PlanOptions, plan_service};
use crate::descriptor::DescriptorSet;
use crate::error::CodegenResult;

/// Show how services would be dispatched
///
/// # Examples
///
///   rsocket-rpc-codegen plan -d services.json
///   rsocket-rpc-codegen plan -d services.json -s EchoService -f json-pretty
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Descriptor input
    #[command(flatten)]
    pub input: DescriptorArgs,

    /// Plan without the metrics decorator
    #[arg(long)]
    pub no_metrics: bool,
}

impl PlanCommand {
    /// Execute the plan command
    ///
    /// Services that fail to plan are reported alongside the others; the
    /// command itself only fails on unreadable input.
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if the descriptor set cannot be loaded or the
    /// report cannot be written.
    pub fn execute(self, format: OutputFormat) -> CodegenResult<()> {
        let set = self.input.load()?;
        let report = self.build_report(&set);

        let formatter = get_formatter(format);
        let mut stdout = std::io::stdout().lock();
        formatter.write_plans(&report, &mut stdout)
    }

    fn build_report(&self, set: &DescriptorSet) -> PlanReport {
        let options = PlanOptions {
            metrics: !self.no_metrics,
        };

        let mut report = PlanReport::default();
        for (file, service) in set.services() {
            match plan_service(service, &options) {
                Ok(plan) => report.plans.push(plan),
                Err(error) => {
                    tracing::warn!(
                        file = %file.name,
                        service = %service.name,
                        rule = error.rule(),
                        "Cannot plan service '{}': {}",
                        service.name,
                        error
                    );
                    report
                        .failures
                        .push(FailureReport::new(&file.name, &service.name, &error));
                }
            }
        }
        report
    }
}
