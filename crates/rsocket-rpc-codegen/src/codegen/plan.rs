//! Emission planning
//!
//! Turns a dispatch table into an ordered list of emission tasks, one per
//! method and artifact, plus the server wiring derived from it: the four
//! public entry points and the registration table.
//!
//! Task order is fixed:
//! 1. interface tasks, declaration order
//! 2. client stub tasks, declaration order
//! 3. server stub tasks, bucket by bucket in [`InteractionSemantic::ALL`]
//!    order, declaration order inside each bucket
//!
//! Planning cannot fail. Everything that could go wrong was already checked
//! while the dispatch table was built.

use serde::{Deserialize, Serialize};

use super::classify::InteractionSemantic;
use super::identifiers::MethodIdentifiers;
use super::routes::{DispatchTable, RouteBinding, build_route_table};
use crate::descriptor::{MethodDefinition, ServiceDefinition};
use crate::error::CodegenResult;

/// Generated artifact families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The service interface users implement
    Interface,
    /// Blocking client delegating to the reactive client
    ClientStub,
    /// Server adapter dispatching incoming calls
    ServerStub,
}

impl ArtifactKind {
    /// Every artifact, in emission order
    pub const ALL: [Self; 3] = [Self::Interface, Self::ClientStub, Self::ServerStub];

    /// Name of the template rendering this artifact
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::ClientStub => "client",
            Self::ServerStub => "server",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.template_name())
    }
}

/// Options for planning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Wrap server handlers in a metrics decorator
    pub metrics: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self { metrics: true }
    }
}

/// Server-only shape of an emission task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTaskOptions {
    /// Handler output passes through the metrics decorator
    pub metrics_decorator: bool,

    /// Handler completes without a value
    pub void_return: bool,
}

/// One per-method fragment of one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmissionTask {
    /// Target artifact
    pub artifact: ArtifactKind,

    /// Interaction semantic selecting the fragment shape
    pub semantic: InteractionSemantic,

    /// Index of the method in the service declaration
    pub position: usize,

    /// The method
    pub method: MethodDefinition,

    /// Derived identifiers
    pub identifiers: MethodIdentifiers,

    /// Generated handler name
    pub handler_name: String,

    /// Set for server stub tasks only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerTaskOptions>,
}

impl EmissionTask {
    fn new(artifact: ArtifactKind, binding: &RouteBinding, options: &PlanOptions) -> Self {
        let server = (artifact == ArtifactKind::ServerStub).then(|| ServerTaskOptions {
            metrics_decorator: options.metrics,
            void_return: binding.semantic.is_void(),
        });

        Self {
            artifact,
            semantic: binding.semantic,
            position: binding.position,
            method: binding.method.clone(),
            identifiers: binding.identifiers.clone(),
            handler_name: binding.handler_name.clone(),
            server,
        }
    }
}

/// How a server entry point selects its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
    /// Decode metadata, then switch over the route
    RouteSwitch,
    /// Wait for the first payload, decode it, then switch over the route
    DecodeThenDispatch,
}

/// A route → handler arm of a dispatch switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerWiring {
    /// Route key of the method
    pub route_key: String,

    /// Constant the switch arm matches on
    pub route_constant: String,

    /// Handler invoked by the arm
    pub handler_name: String,
}

impl From<&RouteBinding> for HandlerWiring {
    fn from(binding: &RouteBinding) -> Self {
        Self {
            route_key: binding.route_key.clone(),
            route_constant: binding.identifiers.route_constant.clone(),
            handler_name: binding.handler_name.clone(),
        }
    }
}

/// One of the four public server entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerEntryPoint {
    /// Semantic served by this entry point
    pub semantic: InteractionSemantic,

    /// Public method name (e.g. `requestResponse`)
    pub name: String,

    /// Name of the decode-and-dispatch method, absent when decoding happens
    /// inline on the first payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoder_name: Option<String>,

    /// Handler selection strategy
    pub strategy: DispatchStrategy,

    /// Switch arms in bucket order
    pub handlers: Vec<HandlerWiring>,

    /// Error message emitted when there are no handlers
    pub unimplemented_message: String,
}

impl ServerEntryPoint {
    fn new(semantic: InteractionSemantic, bucket: &[RouteBinding]) -> Self {
        let strategy = match semantic {
            InteractionSemantic::ClientOrBidiStream => DispatchStrategy::DecodeThenDispatch,
            _ => DispatchStrategy::RouteSwitch,
        };
        let decoder_name = (strategy == DispatchStrategy::RouteSwitch)
            .then(|| format!("doDecodeAndHandle{}", semantic.handler_suffix()));

        Self {
            semantic,
            name: entry_point_name(semantic).to_string(),
            decoder_name,
            strategy,
            handlers: bucket.iter().map(HandlerWiring::from).collect(),
            unimplemented_message: format!("{} is not implemented.", semantic.interaction_name()),
        }
    }

    /// Whether at least one handler is wired
    #[must_use]
    pub fn is_implemented(&self) -> bool {
        !self.handlers.is_empty()
    }
}

fn entry_point_name(semantic: InteractionSemantic) -> &'static str {
    match semantic {
        InteractionSemantic::OneWay => "fireAndForget",
        InteractionSemantic::UnarySingleResponse => "requestResponse",
        InteractionSemantic::ServerStream => "requestStream",
        InteractionSemantic::ClientOrBidiStream => "requestChannel",
    }
}

/// A handler registered under its route in a per-semantic registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Semantic of the handler
    pub semantic: InteractionSemantic,

    /// Registry the handler is put into (e.g. `requestStreamRegistry`)
    pub registry: String,

    /// Route key of the method
    pub route_key: String,

    /// Constant naming the route
    pub route_constant: String,

    /// Registered handler
    pub handler_name: String,
}

/// Method counts per semantic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// One-way methods
    pub one_way: usize,
    /// Unary methods
    pub unary: usize,
    /// Server streaming methods
    pub server_stream: usize,
    /// Client streaming and bidirectional methods
    pub channel: usize,
}

impl PlanSummary {
    /// Count for one semantic
    #[must_use]
    pub const fn count(&self, semantic: InteractionSemantic) -> usize {
        match semantic {
            InteractionSemantic::OneWay => self.one_way,
            InteractionSemantic::UnarySingleResponse => self.unary,
            InteractionSemantic::ServerStream => self.server_stream,
            InteractionSemantic::ClientOrBidiStream => self.channel,
        }
    }

    /// Total number of methods
    #[must_use]
    pub const fn total(&self) -> usize {
        self.one_way + self.unary + self.server_stream + self.channel
    }
}

/// Fully resolved generation plan for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmissionPlan {
    /// Service name
    pub service_name: String,

    /// Qualified service identifier
    pub service_id: String,

    /// Options the plan was built with
    pub options: PlanOptions,

    /// Ordered emission tasks
    pub tasks: Vec<EmissionTask>,

    /// Always four, in [`InteractionSemantic::ALL`] order
    pub entry_points: Vec<ServerEntryPoint>,

    /// Registrations in bucket order
    pub registrations: Vec<Registration>,

    /// Counts per semantic
    pub summary: PlanSummary,
}

impl EmissionPlan {
    /// Tasks of one artifact, in emission order
    pub fn tasks_for(&self, artifact: ArtifactKind) -> impl Iterator<Item = &EmissionTask> {
        self.tasks.iter().filter(move |task| task.artifact == artifact)
    }

    /// Server stub tasks of one semantic, in declaration order
    pub fn server_tasks(&self, semantic: InteractionSemantic) -> impl Iterator<Item = &EmissionTask> {
        self.tasks_for(ArtifactKind::ServerStub)
            .filter(move |task| task.semantic == semantic)
    }

    /// Entry point serving a semantic
    #[must_use]
    pub fn entry_point(&self, semantic: InteractionSemantic) -> Option<&ServerEntryPoint> {
        self.entry_points
            .iter()
            .find(|entry| entry.semantic == semantic)
    }
}

/// Plan the emission of a service from its dispatch table
#[must_use]
pub fn plan(service: &ServiceDefinition, table: &DispatchTable, options: &PlanOptions) -> EmissionPlan {
    let mut declared: Vec<&RouteBinding> = table.bindings().collect();
    declared.sort_by_key(|binding| binding.position);

    let mut tasks = Vec::with_capacity(declared.len() * ArtifactKind::ALL.len());
    for artifact in [ArtifactKind::Interface, ArtifactKind::ClientStub] {
        tasks.extend(
            declared
                .iter()
                .map(|binding| EmissionTask::new(artifact, binding, options)),
        );
    }
    tasks.extend(
        table
            .bindings()
            .map(|binding| EmissionTask::new(ArtifactKind::ServerStub, binding, options)),
    );

    let entry_points: Vec<_> = table
        .buckets()
        .map(|(semantic, bucket)| ServerEntryPoint::new(semantic, bucket))
        .collect();

    let registrations = table
        .bindings()
        .map(|binding| Registration {
            semantic: binding.semantic,
            registry: format!("{}Registry", entry_point_name(binding.semantic)),
            route_key: binding.route_key.clone(),
            route_constant: binding.identifiers.route_constant.clone(),
            handler_name: binding.handler_name.clone(),
        })
        .collect();

    let summary = PlanSummary {
        one_way: table.bucket(InteractionSemantic::OneWay).len(),
        unary: table.bucket(InteractionSemantic::UnarySingleResponse).len(),
        server_stream: table.bucket(InteractionSemantic::ServerStream).len(),
        channel: table.bucket(InteractionSemantic::ClientOrBidiStream).len(),
    };

    tracing::debug!(
        service = %service.name,
        tasks = tasks.len(),
        unimplemented = entry_points.iter().filter(|e| !e.is_implemented()).count(),
        "planned emission"
    );

    EmissionPlan {
        service_name: service.name.clone(),
        service_id: table.service_id.clone(),
        options: *options,
        tasks,
        entry_points,
        registrations,
        summary,
    }
}

/// Build the dispatch table of a service and plan it
///
/// # Errors
///
/// Propagates the errors of [`build_route_table`].
pub fn plan_service(service: &ServiceDefinition, options: &PlanOptions) -> CodegenResult<EmissionPlan> {
    let table = build_route_table(service)?;
    Ok(plan(service, &table, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> ServiceDefinition {
        ServiceDefinition::new("Mixed")
            .with_namespace("io.example")
            .with_method(MethodDefinition::new("Chat", "In", "Out").client_streaming())
            .with_method(MethodDefinition::new("Get", "In", "Out"))
            .with_method(MethodDefinition::new("Fire", "In", "Empty").one_way())
            .with_method(MethodDefinition::new("Watch", "In", "Out").server_streaming())
            .with_method(MethodDefinition::new("Put", "In", "Out"))
    }

    fn names<'a>(tasks: impl Iterator<Item = &'a EmissionTask>) -> Vec<&'a str> {
        tasks.map(|t| t.method.name.as_str()).collect()
    }

    #[test]
    fn test_task_order() {
        let plan = plan_service(&mixed(), &PlanOptions::default()).unwrap();

        assert_eq!(plan.tasks.len(), 15);
        assert_eq!(
            names(plan.tasks_for(ArtifactKind::Interface)),
            vec!["Chat", "Get", "Fire", "Watch", "Put"]
        );
        assert_eq!(
            names(plan.tasks_for(ArtifactKind::ClientStub)),
            vec!["Chat", "Get", "Fire", "Watch", "Put"]
        );
        assert_eq!(
            names(plan.tasks_for(ArtifactKind::ServerStub)),
            vec!["Fire", "Get", "Put", "Watch", "Chat"]
        );

        // interface, then client, then server
        let kinds: Vec<_> = plan.tasks.iter().map(|t| t.artifact).collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_server_options_only_on_server_tasks() {
        let plan = plan_service(&mixed(), &PlanOptions::default()).unwrap();
        for task in &plan.tasks {
            match task.artifact {
                ArtifactKind::ServerStub => {
                    let server = task.server.unwrap();
                    assert!(server.metrics_decorator);
                    assert_eq!(server.void_return, task.semantic == InteractionSemantic::OneWay);
                }
                _ => assert!(task.server.is_none()),
            }
        }
    }

    #[test]
    fn test_metrics_disabled() {
        let plan = plan_service(&mixed(), &PlanOptions { metrics: false }).unwrap();
        assert!(
            plan.tasks_for(ArtifactKind::ServerStub)
                .all(|t| !t.server.unwrap().metrics_decorator)
        );
    }

    #[test]
    fn test_entry_points_for_empty_service() {
        let plan = plan_service(&ServiceDefinition::new("Nothing"), &PlanOptions::default()).unwrap();
        assert!(plan.tasks.is_empty());
        assert_eq!(plan.entry_points.len(), 4);

        let names: Vec<_> = plan.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["fireAndForget", "requestResponse", "requestStream", "requestChannel"]
        );
        for entry in &plan.entry_points {
            assert!(!entry.is_implemented());
            assert!(entry.unimplemented_message.ends_with("is not implemented."));
        }
    }

    #[test]
    fn test_entry_point_strategies() {
        let plan = plan_service(&mixed(), &PlanOptions::default()).unwrap();

        let channel = plan.entry_point(InteractionSemantic::ClientOrBidiStream).unwrap();
        assert_eq!(channel.strategy, DispatchStrategy::DecodeThenDispatch);
        assert!(channel.decoder_name.is_none());
        assert_eq!(channel.handlers[0].handler_name, "doChatRequestChannel");

        let unary = plan.entry_point(InteractionSemantic::UnarySingleResponse).unwrap();
        assert_eq!(unary.strategy, DispatchStrategy::RouteSwitch);
        assert_eq!(unary.decoder_name.as_deref(), Some("doDecodeAndHandleRequestResponse"));
        let arms: Vec<_> = unary.handlers.iter().map(|h| h.route_constant.as_str()).collect();
        assert_eq!(arms, vec!["ROUTE_GET", "ROUTE_PUT"]);
    }

    #[test]
    fn test_registrations_and_summary() {
        let plan = plan_service(&mixed(), &PlanOptions::default()).unwrap();
        let registries: Vec<_> = plan.registrations.iter().map(|r| r.registry.as_str()).collect();
        assert_eq!(
            registries,
            vec![
                "fireAndForgetRegistry",
                "requestResponseRegistry",
                "requestResponseRegistry",
                "requestStreamRegistry",
                "requestChannelRegistry"
            ]
        );
        assert_eq!(plan.summary.unary, 2);
        assert_eq!(plan.summary.total(), 5);
        assert_eq!(plan.summary.count(InteractionSemantic::ClientOrBidiStream), 1);
    }
}
