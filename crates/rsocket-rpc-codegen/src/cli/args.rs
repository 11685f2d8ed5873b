//! Shared CLI argument types

use clap::Args;
use std::path::PathBuf;

use crate::descriptor::{DescriptorSet, SchemaFile, ServiceDefinition};
use crate::error::{CodegenError, CodegenResult};

/// Where service descriptors are read from
#[derive(Debug, Clone, Args)]
pub struct DescriptorArgs {
    /// Descriptor set (JSON) produced by the schema front end
    #[arg(
        long,
        short = 'd',
        value_name = "FILE",
        env = "RSOCKET_RPC_CODEGEN_DESCRIPTOR"
    )]
    pub descriptor: PathBuf,

    /// Only handle the named service
    #[arg(long, short = 's', value_name = "NAME")]
    pub service: Option<String>,
}

impl DescriptorArgs {
    /// Load the descriptor set, narrowed to `--service` when given
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Io` or `CodegenError::Serialization` if the
    /// file cannot be read, and `CodegenError::Configuration` if the
    /// requested service does not exist.
    pub fn load(&self) -> CodegenResult<DescriptorSet> {
        let set = DescriptorSet::from_json_file(&self.descriptor)?;
        tracing::info!(
            descriptor = %self.descriptor.display(),
            files = set.files.len(),
            "Loaded descriptor set"
        );

        match &self.service {
            None => Ok(set),
            Some(name) => narrow(set, name).ok_or_else(|| {
                CodegenError::configuration_with_key(
                    format!(
                        "Service '{name}' not found in {}",
                        self.descriptor.display()
                    ),
                    "service",
                )
            }),
        }
    }
}

/// Keep only the schema file declaring `name`, with only that service
fn narrow(set: DescriptorSet, name: &str) -> Option<DescriptorSet> {
    set.files.into_iter().find_map(|file| {
        let SchemaFile {
            name: file_name,
            target_package,
            services,
        } = file;
        let service: ServiceDefinition = services.into_iter().find(|s| s.name == name)?;
        Some(DescriptorSet {
            files: vec![SchemaFile {
                name: file_name,
                target_package,
                services: vec![service],
            }],
        })
    })
}
