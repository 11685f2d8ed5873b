//! Route table construction
//!
//! Derives a route key per method and buckets the methods by interaction
//! semantic. Buckets keep declaration order; dispatch switches and
//! registration tables are generated by walking them in that order, which
//! keeps generated output stable from run to run.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::classify::{InteractionSemantic, classify};
use super::identifiers::{MethodIdentifiers, service_identifier};
use crate::descriptor::{MethodDefinition, ServiceDefinition};
use crate::error::{CodegenError, CodegenResult};

/// A method bound to its route key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteBinding {
    /// Unique dispatch key
    pub route_key: String,

    /// Interaction semantic of the method
    pub semantic: InteractionSemantic,

    /// Index of the method in the service declaration
    pub position: usize,

    /// Name of the generated per-method handler (e.g. `doEchoRequestResponse`)
    pub handler_name: String,

    /// Derived identifiers
    pub identifiers: MethodIdentifiers,

    /// The method itself
    pub method: MethodDefinition,
}

/// Semantic → ordered route bindings for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchTable {
    /// Service name
    pub service_name: String,

    /// Qualified service identifier
    pub service_id: String,

    buckets: BTreeMap<InteractionSemantic, Vec<RouteBinding>>,
}

impl DispatchTable {
    fn empty(service_name: &str, service_id: String) -> Self {
        Self {
            service_name: service_name.to_string(),
            service_id,
            buckets: InteractionSemantic::ALL
                .into_iter()
                .map(|semantic| (semantic, Vec::new()))
                .collect(),
        }
    }

    /// Bindings of one semantic, in declaration order
    #[must_use]
    pub fn bucket(&self, semantic: InteractionSemantic) -> &[RouteBinding] {
        self.buckets.get(&semantic).map_or(&[], Vec::as_slice)
    }

    /// Iterate all four buckets in [`InteractionSemantic::ALL`] order
    pub fn buckets(&self) -> impl Iterator<Item = (InteractionSemantic, &[RouteBinding])> {
        InteractionSemantic::ALL
            .into_iter()
            .map(move |semantic| (semantic, self.bucket(semantic)))
    }

    /// Every binding, bucket by bucket
    pub fn bindings(&self) -> impl Iterator<Item = &RouteBinding> {
        self.buckets().flat_map(|(_, bucket)| bucket.iter())
    }

    /// Look a binding up by route key
    #[must_use]
    pub fn get(&self, route_key: &str) -> Option<&RouteBinding> {
        self.bindings().find(|binding| binding.route_key == route_key)
    }

    /// Every route key, bucket by bucket
    pub fn route_keys(&self) -> impl Iterator<Item = &str> {
        self.bindings().map(|binding| binding.route_key.as_str())
    }

    /// Total number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether the service declares no methods
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the dispatch table of a service
///
/// Methods are scanned in declaration order. The first invalid name or
/// duplicate route key aborts the build; no partial table is returned.
///
/// # Errors
///
/// - `CodegenError::InvalidIdentifier` if the service or a method name
///   cannot be transformed.
/// - `CodegenError::DuplicateRoute` if two methods derive the same route key.
pub fn build_route_table(service: &ServiceDefinition) -> CodegenResult<DispatchTable> {
    let service_id = service_identifier(service)?;
    let mut table = DispatchTable::empty(&service.name, service_id);
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(service.methods.len());

    for (position, method) in service.methods.iter().enumerate() {
        let identifiers = MethodIdentifiers::derive(&table.service_id, &method.name)
            .map_err(|e| e.with_service(&service.name))?;

        if let Some(first) = seen.get(&identifiers.route_key) {
            return Err(CodegenError::duplicate_route(
                &service.name,
                &identifiers.route_key,
                *first,
                &method.name,
            ));
        }
        seen.insert(identifiers.route_key.clone(), &method.name);

        let semantic = classify(method);
        tracing::trace!(
            service = %service.name,
            method = %method.name,
            %semantic,
            "classified method"
        );

        let binding = RouteBinding {
            route_key: identifiers.route_key.clone(),
            semantic,
            position,
            handler_name: format!("do{}{}", method.name, semantic.handler_suffix()),
            identifiers,
            method: method.clone(),
        };
        table.buckets.entry(semantic).or_default().push(binding);
    }

    tracing::debug!(
        service = %service.name,
        one_way = table.bucket(InteractionSemantic::OneWay).len(),
        unary = table.bucket(InteractionSemantic::UnarySingleResponse).len(),
        server_stream = table.bucket(InteractionSemantic::ServerStream).len(),
        channel = table.bucket(InteractionSemantic::ClientOrBidiStream).len(),
        "built dispatch table"
    );

    Ok(table)
}
