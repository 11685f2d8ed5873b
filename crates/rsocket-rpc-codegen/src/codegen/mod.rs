//! Code generation layer
//!
//! The planning core ([`identifiers`], [`classify`], [`routes`], [`plan`])
//! decides what gets generated; the rendering layer ([`context`],
//! [`template_engine`], [`generator`]) spells it out as Java sources.

pub mod classify;
pub mod context;
pub mod doc;
pub mod generator;
pub mod identifiers;
pub mod plan;
pub mod routes;
pub mod template_engine;

// Re-export main types
pub use classify::{InteractionSemantic, classify, classify_flags};
pub use generator::{BatchReport, GeneratedArtifact, GeneratedService, ServiceFailure, ServiceGenerator};
pub use identifiers::{MethodIdentifiers, service_identifier, to_lower_camel, to_screaming_snake};
pub use plan::{
    ArtifactKind, DispatchStrategy, EmissionPlan, EmissionTask, PlanOptions, ServerEntryPoint,
    plan, plan_service,
};
pub use routes::{DispatchTable, RouteBinding, build_route_table};
pub use template_engine::TemplateEngine;
