//! Generate command implementation
//!
//! Generates blocking Java sources for every service of a descriptor set.

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::cli::args::DescriptorArgs;
use crate::cli::output::{
    FailureReport, GeneratedReport, GenerationReport, OutputFormat, get_formatter,
};
use crate::codegen::{BatchReport, ServiceGenerator};
use crate::config::RenderConfig;
use crate::error::{CodegenError, CodegenResult};

/// Generate blocking Java sources
///
/// Every service of the descriptor set yields an interface, a client and a
/// server, written below the output directory following the target package.
/// A service that cannot be generated is reported and skipped; the command
/// then exits non-zero once the remaining services are written.
///
/// # Examples
///
/// Generate everything:
///   rsocket-rpc-codegen generate -d services.json -o src/main/java
///
/// Check what would be written, without metrics:
///   rsocket-rpc-codegen generate -d services.json -o out --no-metrics --dry-run
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Descriptor input
    #[command(flatten)]
    pub input: DescriptorArgs,

    /// Output directory for generated sources
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: PathBuf,

    /// Render configuration file (TOML, YAML or JSON)
    #[arg(long, short = 'c', value_name = "FILE", env = "RSOCKET_RPC_CODEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Leave the compiler version out of `@Generated`
    #[arg(long)]
    pub no_version: bool,

    /// Do not wrap server handlers in the metrics decorator
    #[arg(long)]
    pub no_metrics: bool,

    /// Render everything but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    ///
    /// # Errors
    ///
    /// Returns `CodegenError` if the configuration or descriptor set cannot
    /// be loaded, if a file cannot be written, or the error of the first
    /// service that failed.
    pub fn execute(self, format: OutputFormat) -> CodegenResult<()> {
        let config = self.render_config()?;
        let generator = ServiceGenerator::new(config)?;

        let set = self.input.load()?;
        let batch = generator.generate_all(&set);
        let report = self.write_batch(&batch)?;

        let formatter = get_formatter(format);
        let mut stdout = std::io::stdout().lock();
        formatter.write_generation(&report, &mut stdout)?;

        match batch.failures.into_iter().next() {
            None => {
                info!(
                    services = report.generated.len(),
                    output = %self.output.display(),
                    "Generation complete"
                );
                Ok(())
            }
            Some(first) => Err(first.error),
        }
    }

    /// Configuration file (or defaults) with command-line overrides applied
    fn render_config(&self) -> CodegenResult<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!(config = %path.display(), "Loading render configuration");
                RenderConfig::from_file(path)?
            }
            None => RenderConfig::default(),
        };

        if self.no_version {
            config.include_version = false;
        }
        if self.no_metrics {
            config.metrics = false;
        }
        Ok(config)
    }

    /// Write generated services, or just list their paths on a dry run
    fn write_batch(&self, batch: &BatchReport) -> CodegenResult<GenerationReport> {
        if !self.dry_run && self.output.exists() && !self.output.is_dir() {
            return Err(CodegenError::configuration_with_key(
                format!("Output path is not a directory: {}", self.output.display()),
                "output",
            ));
        }

        let mut generated = Vec::with_capacity(batch.generated.len());
        for service in &batch.generated {
            let files = if self.dry_run {
                service
                    .artifacts
                    .iter()
                    .map(|artifact| self.output.join(&artifact.path))
                    .collect()
            } else {
                service.write_to(&self.output)?
            };

            generated.push(GeneratedReport {
                service: service.service_name.clone(),
                service_id: service.service_id.clone(),
                summary: service.summary,
                files,
            });
        }

        Ok(GenerationReport {
            output: self.output.clone(),
            dry_run: self.dry_run,
            generated,
            failures: batch
                .failures
                .iter()
                .map(|failure| FailureReport::new(&failure.file, &failure.service, &failure.error))
                .collect(),
        })
    }
}
