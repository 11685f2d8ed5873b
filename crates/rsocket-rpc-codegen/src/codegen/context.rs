//! Context data structures for code generation
//!
//! These structures are what the Handlebars templates see. They are flat,
//! pre-resolved views of an [`EmissionPlan`](super::plan::EmissionPlan):
//! every name is already derived and every shape decision already made, so
//! templates only spell things out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context shared by the interface, client and server templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceContext {
    /// Target package, if any
    pub package: Option<String>,

    /// Schema file the service was declared in
    pub file_name: String,

    /// Service name
    pub service_name: String,

    /// Qualified service identifier, value of `SERVICE_ID`
    pub service_id: String,

    /// Interface class name (e.g. `BlockingEchoService`)
    pub interface_name: String,

    /// Blocking client class name
    pub client_name: String,

    /// Qualified name of the reactive client the blocking one delegates to
    pub delegate_client: String,

    /// Server class name
    pub server_name: String,

    /// Value of the `@Generated` annotation
    pub generated_by: String,

    /// Whether server handlers are wrapped in the metrics decorator
    pub metrics: bool,

    /// Service doc comment body
    pub doc: Vec<String>,

    /// Interface methods, declaration order
    pub interface_methods: Vec<MethodContext>,

    /// Client methods, declaration order
    pub client_methods: Vec<MethodContext>,

    /// Server handlers, bucket order
    pub server_methods: Vec<MethodContext>,

    /// `fireAndForget` entry point
    pub fire_and_forget: EntryPointContext,

    /// `requestResponse` entry point
    pub request_response: EntryPointContext,

    /// `requestStream` entry point
    pub request_stream: EntryPointContext,

    /// `requestChannel` entry point
    pub request_channel: EntryPointContext,

    /// `selfRegister` lines, bucket order
    pub registrations: Vec<RegistrationContext>,

    /// Symbol table read by the `sym` helper
    pub symbols: BTreeMap<String, String>,
}

/// Per-method view, one per emission task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodContext {
    /// Raw schema name
    pub name: String,

    /// Generated method name
    pub lower_name: String,

    /// `METHOD_` constant
    pub method_constant: String,

    /// `ROUTE_` constant
    pub route_constant: String,

    /// Server handler name
    pub handler_name: String,

    /// Qualified request type
    pub input_type: String,

    /// Qualified response type
    pub output_type: String,

    /// Semantic, snake case
    pub semantic: String,

    /// Requests arrive as a stream
    pub takes_stream: bool,

    /// Responses leave as a stream
    pub returns_stream: bool,

    /// No response at all
    pub void_return: bool,

    /// Handler output goes through the metrics decorator
    pub metrics_decorator: bool,

    /// Method doc comment body
    pub doc: Vec<String>,
}

/// View of one server entry point
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPointContext {
    /// Public method name
    pub name: String,

    /// Decode-and-dispatch method name, if the route is switched on
    /// separately
    pub decoder_name: Option<String>,

    /// At least one handler is wired
    pub implemented: bool,

    /// Error message of the unimplemented form
    pub unimplemented_message: String,

    /// Switch arms
    pub handlers: Vec<HandlerContext>,

    /// Server tasks of this entry point's semantic
    pub methods: Vec<MethodContext>,
}

/// A switch arm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerContext {
    /// Route constant matched on
    pub route_constant: String,

    /// Handler called
    pub handler_name: String,
}

/// A `selfRegister` line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationContext {
    /// Registry map
    pub registry: String,

    /// Route constant used as key
    pub route_constant: String,

    /// Handler registered
    pub handler_name: String,
}
