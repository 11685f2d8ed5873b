//! rsocket-rpc-codegen: RSocket RPC service compiler
//!
//! Takes service descriptors produced by a schema front end and generates
//! blocking Java sources for them: a service interface, a client stub and a
//! server stub that dispatches the four RSocket interaction models.
//!
//! # Quick Start
//!
//! ```bash
//! # Generate sources for every service of a descriptor set
//! rsocket-rpc-codegen generate -d services.json -o src/main/java
//!
//! # Show how a service would be dispatched
//! rsocket-rpc-codegen plan -d services.json -s EchoService
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Planning core                                           │
//! │ • identifiers: method names → constants, route keys     │
//! │ • classify: streaming flags → InteractionSemantic       │
//! │ • routes: DispatchTable, one bucket per semantic        │
//! │ • plan: EmissionPlan, entry points, registrations       │
//! └─────────────────────────────────────────────────────────┘
//!                           ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │ Rendering layer                                         │
//! │ • context: flat template views of a plan                │
//! │ • TemplateEngine: Handlebars, symbol table via `sym`    │
//! │ • ServiceGenerator: per-service and batch generation    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Library use
//!
//! ```
//! use rsocket_rpc_codegen::prelude::*;
//!
//! let service = ServiceDefinition::new("EchoService")
//!     .with_namespace("io.example")
//!     .with_method(MethodDefinition::new("Echo", "Msg", "Msg"))
//!     .with_method(MethodDefinition::new("Notify", "Msg", "Empty").one_way());
//!
//! let table = build_route_table(&service)?;
//! let plan = plan(&service, &table, &PlanOptions::default());
//!
//! assert_eq!(plan.entry_points.len(), 4);
//! assert_eq!(plan.summary.one_way, 1);
//! # Ok::<(), CodegenError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod error;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use error::{CodegenError, CodegenResult};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::codegen::{
        ArtifactKind, BatchReport, DispatchTable, EmissionPlan, InteractionSemantic,
        MethodIdentifiers, PlanOptions, ServiceGenerator, build_route_table, classify, plan,
        plan_service,
    };
    pub use crate::config::RenderConfig;
    pub use crate::descriptor::{DescriptorSet, MethodDefinition, SchemaFile, ServiceDefinition, TypeRef};
    pub use crate::error::{CodegenError, CodegenResult};
}

/// Version of rsocket-rpc-codegen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
