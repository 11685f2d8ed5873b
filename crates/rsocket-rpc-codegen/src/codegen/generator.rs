//! Java source generator
//!
//! This module provides the `ServiceGenerator` that runs a service through
//! the planning core and renders the resulting plan into the interface,
//! client and server sources.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::codegen::classify::InteractionSemantic;
use crate::config::RenderConfig;
use crate::descriptor::{DescriptorSet, SchemaFile, ServiceDefinition};
use crate::error::{CodegenError, CodegenResult};

use super::context::{
    EntryPointContext, HandlerContext, MethodContext, RegistrationContext, ServiceContext,
};
use super::doc::descriptor_doc;
use super::plan::{ArtifactKind, EmissionPlan, EmissionTask, PlanSummary, plan_service};
use super::template_engine::TemplateEngine;

/// One generated source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    /// Artifact family
    pub kind: ArtifactKind,

    /// Class name
    pub class_name: String,

    /// Path relative to the output directory
    pub path: PathBuf,

    /// Source text
    pub content: String,
}

/// Every artifact generated for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedService {
    /// Service name
    pub service_name: String,

    /// Qualified service identifier
    pub service_id: String,

    /// Methods per semantic
    pub summary: PlanSummary,

    /// Interface, client and server, in that order
    pub artifacts: Vec<GeneratedArtifact>,
}

impl GeneratedService {
    /// Artifact of one kind
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|artifact| artifact.kind == kind)
    }

    /// Write every artifact below `dir`, creating package directories
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Io` if a directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> CodegenResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.artifacts.len());
        for artifact in &self.artifacts {
            let path = dir.join(&artifact.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &artifact.content)?;
            tracing::debug!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

/// A service that could not be generated
#[derive(Debug)]
pub struct ServiceFailure {
    /// Schema file declaring the service
    pub file: String,

    /// Service name
    pub service: String,

    /// Why generation stopped
    pub error: CodegenError,
}

/// Outcome of generating a whole descriptor set
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Services generated successfully, in descriptor order
    pub generated: Vec<GeneratedService>,

    /// Services skipped, in descriptor order
    pub failures: Vec<ServiceFailure>,
}

impl BatchReport {
    /// Whether every service was generated
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Service generator
///
/// Owns the template engine and the render configuration; one instance can
/// generate any number of services.
#[derive(Debug)]
pub struct ServiceGenerator {
    /// Template engine
    template_engine: TemplateEngine,

    /// Render configuration
    config: RenderConfig,
}

impl ServiceGenerator {
    /// Create a new generator
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Configuration` for an invalid configuration and
    /// the errors of [`TemplateEngine::with_overrides`].
    pub fn new(config: RenderConfig) -> CodegenResult<Self> {
        config.validate()?;
        let template_engine = TemplateEngine::with_overrides(&config.templates)?;

        Ok(Self {
            template_engine,
            config,
        })
    }

    /// Render configuration in use
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Plan a service without rendering it
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::InvalidIdentifier` or
    /// `CodegenError::DuplicateRoute` for descriptors that cannot be planned.
    pub fn plan(&self, service: &ServiceDefinition) -> CodegenResult<EmissionPlan> {
        plan_service(service, &self.config.plan_options())
    }

    /// Generate the sources of one service
    ///
    /// # Errors
    ///
    /// Returns the planning errors of [`ServiceGenerator::plan`] and
    /// `CodegenError::Template` if rendering fails.
    pub fn generate(
        &self,
        file: &SchemaFile,
        service: &ServiceDefinition,
    ) -> CodegenResult<GeneratedService> {
        tracing::info!("Generating sources for service {}", service.name);

        let plan = self.plan(service)?;
        let context = self.build_service_context(file, service, &plan);

        let artifacts = ArtifactKind::ALL
            .into_iter()
            .map(|kind| {
                let class_name = match kind {
                    ArtifactKind::Interface => context.interface_name.clone(),
                    ArtifactKind::ClientStub => context.client_name.clone(),
                    ArtifactKind::ServerStub => context.server_name.clone(),
                };
                let content = self.template_engine.render(kind, &context)?;
                Ok(GeneratedArtifact {
                    kind,
                    path: artifact_path(file.target_package.as_deref(), &class_name),
                    class_name,
                    content,
                })
            })
            .collect::<CodegenResult<Vec<_>>>()?;

        Ok(GeneratedService {
            service_name: service.name.clone(),
            service_id: plan.service_id,
            summary: plan.summary,
            artifacts,
        })
    }

    /// Generate every service of a descriptor set
    ///
    /// A failing service is recorded and skipped; the others are still
    /// generated.
    pub fn generate_all(&self, set: &DescriptorSet) -> BatchReport {
        let mut report = BatchReport::default();

        for (file, service) in set.services() {
            match self.generate(file, service) {
                Ok(generated) => report.generated.push(generated),
                Err(error) => {
                    tracing::warn!(
                        file = %file.name,
                        service = %service.name,
                        rule = error.rule(),
                        "Skipping service '{}': {}",
                        service.name,
                        error
                    );
                    report.failures.push(ServiceFailure {
                        file: file.name.clone(),
                        service: service.name.clone(),
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            generated = report.generated.len(),
            failed = report.failures.len(),
            "batch finished"
        );
        report
    }

    /// Build the template context of a planned service
    fn build_service_context(
        &self,
        file: &SchemaFile,
        service: &ServiceDefinition,
        plan: &EmissionPlan,
    ) -> ServiceContext {
        let config = &self.config;
        let package = file
            .target_package
            .as_ref()
            .filter(|package| !package.is_empty())
            .cloned();

        let reactive_client = format!("{}{}", service.name, config.client_suffix);
        let delegate_client = match &package {
            Some(package) => format!("{package}.{reactive_client}"),
            None => reactive_client,
        };

        let generated_by = if config.include_version {
            format!("by RSocket RPC proto compiler (version {})", crate::VERSION)
        } else {
            "by RSocket RPC proto compiler".to_string()
        };

        let methods_for =
            |kind: ArtifactKind| plan.tasks_for(kind).map(method_context).collect::<Vec<_>>();

        ServiceContext {
            package,
            file_name: file.name.clone(),
            service_name: service.name.clone(),
            service_id: plan.service_id.clone(),
            interface_name: format!("{}{}", config.interface_prefix, service.name),
            client_name: format!(
                "{}{}{}",
                config.interface_prefix, service.name, config.client_suffix
            ),
            delegate_client,
            server_name: format!(
                "{}{}{}",
                config.interface_prefix, service.name, config.server_suffix
            ),
            generated_by,
            metrics: plan.options.metrics,
            doc: descriptor_doc(service.doc.as_deref()),
            interface_methods: methods_for(ArtifactKind::Interface),
            client_methods: methods_for(ArtifactKind::ClientStub),
            server_methods: methods_for(ArtifactKind::ServerStub),
            fire_and_forget: entry_point_context(plan, InteractionSemantic::OneWay),
            request_response: entry_point_context(plan, InteractionSemantic::UnarySingleResponse),
            request_stream: entry_point_context(plan, InteractionSemantic::ServerStream),
            request_channel: entry_point_context(plan, InteractionSemantic::ClientOrBidiStream),
            registrations: plan
                .registrations
                .iter()
                .map(|registration| RegistrationContext {
                    registry: registration.registry.clone(),
                    route_constant: registration.route_constant.clone(),
                    handler_name: registration.handler_name.clone(),
                })
                .collect(),
            symbols: config.symbols.clone(),
        }
    }
}

fn method_context(task: &EmissionTask) -> MethodContext {
    let ids = &task.identifiers;
    let channel = task.semantic == InteractionSemantic::ClientOrBidiStream;

    MethodContext {
        name: ids.raw.clone(),
        lower_name: ids.lower_camel.clone(),
        method_constant: ids.method_constant.clone(),
        route_constant: ids.route_constant.clone(),
        handler_name: task.handler_name.clone(),
        input_type: task.method.input_type.to_string(),
        output_type: task.method.output_type.to_string(),
        semantic: task.semantic.to_string(),
        takes_stream: channel,
        returns_stream: task.semantic == InteractionSemantic::ServerStream
            || (channel && task.method.server_streaming),
        void_return: task
            .server
            .map_or(task.semantic.is_void(), |server| server.void_return),
        metrics_decorator: task.server.is_some_and(|server| server.metrics_decorator),
        doc: descriptor_doc(task.method.doc.as_deref()),
    }
}

fn entry_point_context(plan: &EmissionPlan, semantic: InteractionSemantic) -> EntryPointContext {
    let Some(entry) = plan.entry_point(semantic) else {
        return EntryPointContext::default();
    };

    EntryPointContext {
        name: entry.name.clone(),
        decoder_name: entry.decoder_name.clone(),
        implemented: entry.is_implemented(),
        unimplemented_message: entry.unimplemented_message.clone(),
        handlers: entry
            .handlers
            .iter()
            .map(|handler| HandlerContext {
                route_constant: handler.route_constant.clone(),
                handler_name: handler.handler_name.clone(),
            })
            .collect(),
        methods: plan.server_tasks(semantic).map(method_context).collect(),
    }
}

/// `io.example` + `Foo` → `io/example/Foo.java`
fn artifact_path(package: Option<&str>, class_name: &str) -> PathBuf {
    let mut path: PathBuf = package
        .unwrap_or_default()
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect();
    path.push(format!("{class_name}.java"));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MethodDefinition;

    fn echo_file() -> SchemaFile {
        SchemaFile {
            name: "echo.proto".to_string(),
            target_package: Some("io.example.echo".to_string()),
            services: vec![
                ServiceDefinition::new("EchoService")
                    .with_namespace("io.example")
                    .with_doc(" Echoes messages.")
                    .with_method(MethodDefinition::new(
                        "Echo",
                        "io.example.echo.Msg",
                        "io.example.echo.Msg",
                    ))
                    .with_method(
                        MethodDefinition::new("Notify", "io.example.echo.Msg", "io.example.echo.Empty")
                            .one_way(),
                    ),
            ],
        }
    }

    fn generator() -> ServiceGenerator {
        ServiceGenerator::new(RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_generate_artifacts() {
        let file = echo_file();
        let generated = generator().generate(&file, &file.services[0]).unwrap();

        assert_eq!(generated.artifacts.len(), 3);
        assert_eq!(generated.service_id, "io.example.EchoService");

        let interface = generated.artifact(ArtifactKind::Interface).unwrap();
        assert_eq!(interface.class_name, "BlockingEchoService");
        assert_eq!(
            interface.path,
            PathBuf::from("io/example/echo/BlockingEchoService.java")
        );
        assert!(interface.content.contains("package io.example.echo;"));
        assert!(interface.content.contains("String SERVICE_ID = \"io.example.EchoService\";"));
        assert!(interface.content.contains("String METHOD_ECHO = \"Echo\";"));
        assert!(interface.content.contains(" * Echoes messages."));

        let client = generated.artifact(ArtifactKind::ClientStub).unwrap();
        assert_eq!(client.class_name, "BlockingEchoServiceClient");
        assert!(client.content.contains("io.example.echo.EchoServiceClient delegate;"));

        let server = generated.artifact(ArtifactKind::ServerStub).unwrap();
        assert_eq!(server.class_name, "BlockingEchoServiceServer");
        assert!(server.content.contains("doEchoRequestResponse"));
        assert!(server.content.contains("Request Stream is not implemented."));
        assert!(server.content.contains("Request Channel is not implemented."));
        assert!(!server.content.contains("Fire And Forget is not implemented."));
    }

    #[test]
    fn test_artifact_path_without_package() {
        assert_eq!(artifact_path(None, "Foo"), PathBuf::from("Foo.java"));
        assert_eq!(artifact_path(Some("a.b"), "Foo"), PathBuf::from("a/b/Foo.java"));
    }

    #[test]
    fn test_version_toggle() {
        let file = echo_file();
        let config = RenderConfig {
            include_version: false,
            ..RenderConfig::default()
        };
        let generated = ServiceGenerator::new(config)
            .unwrap()
            .generate(&file, &file.services[0])
            .unwrap();
        let interface = generated.artifact(ArtifactKind::Interface).unwrap();
        assert!(interface.content.contains("value = \"by RSocket RPC proto compiler\","));
    }

    #[test]
    fn test_generate_all_isolates_failures() {
        let mut file = echo_file();
        file.services.push(
            ServiceDefinition::new("Broken")
                .with_method(MethodDefinition::new("Echo", "A", "B"))
                .with_method(MethodDefinition::new("Echo", "A", "B")),
        );
        let set = DescriptorSet { files: vec![file] };

        let report = generator().generate_all(&set);
        assert!(!report.is_success());
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].service, "Broken");
        assert!(matches!(
            report.failures[0].error,
            CodegenError::DuplicateRoute { .. }
        ));
    }
}
