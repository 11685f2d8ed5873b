//! Service descriptor types
//!
//! The in-memory form of a validated schema, as handed over by a schema
//! front end. Descriptors are plain data: once loaded they are only read.
//! Method order inside a service is significant and preserved everywhere
//! downstream.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CodegenResult;

/// A batch of schema files to generate in one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorSet {
    /// Schema files, in the order the front end produced them
    #[serde(default)]
    pub files: Vec<SchemaFile>,
}

impl DescriptorSet {
    /// Load a descriptor set from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Io` if the file cannot be read and
    /// `CodegenError::Serialization` if it is not a valid descriptor set.
    pub fn from_json_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Parse a descriptor set from JSON text
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Serialization` if the text is not a valid
    /// descriptor set.
    pub fn from_json_str(raw: &str) -> CodegenResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Iterate over every service together with its declaring file
    pub fn services(&self) -> impl Iterator<Item = (&SchemaFile, &ServiceDefinition)> {
        self.files
            .iter()
            .flat_map(|file| file.services.iter().map(move |service| (file, service)))
    }

    /// Find a service by name
    #[must_use]
    pub fn find_service(&self, name: &str) -> Option<(&SchemaFile, &ServiceDefinition)> {
        self.services().find(|(_, service)| service.name == name)
    }
}

/// One schema source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Source file name (e.g. `echo.proto`)
    pub name: String,

    /// Package the generated sources are placed in (e.g. `io.example.echo`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_package: Option<String>,

    /// Services declared in this file
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}

/// A service and its ordered methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Service name, schema-cased
    pub name: String,

    /// Declaring namespace path (e.g. `["io", "example"]`)
    #[serde(default)]
    pub namespace: Vec<String>,

    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,

    /// Free-form documentation attached to the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl ServiceDefinition {
    /// Create a service with no methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
            methods: Vec::new(),
            doc: None,
        }
    }

    /// Set the declaring namespace from a dotted path
    #[must_use]
    pub fn with_namespace(mut self, dotted: &str) -> Self {
        self.namespace = dotted
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Append a method
    #[must_use]
    pub fn with_method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    /// Attach documentation
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A single RPC method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDefinition {
    /// Method name, schema-cased
    pub name: String,

    /// Fully qualified request message type
    pub input_type: TypeRef,

    /// Fully qualified response message type
    pub output_type: TypeRef,

    /// Requests arrive as a stream
    #[serde(default)]
    pub client_streaming: bool,

    /// Responses leave as a stream
    #[serde(default)]
    pub server_streaming: bool,

    /// No response is ever sent
    #[serde(default, alias = "fire_and_forget")]
    pub one_way: bool,

    /// Free-form documentation attached to the method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl MethodDefinition {
    /// Create a unary method
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<TypeRef>,
        output_type: impl Into<TypeRef>,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
            client_streaming: false,
            server_streaming: false,
            one_way: false,
            doc: None,
        }
    }

    /// Mark the request side as streaming
    #[must_use]
    pub fn client_streaming(mut self) -> Self {
        self.client_streaming = true;
        self
    }

    /// Mark the response side as streaming
    #[must_use]
    pub fn server_streaming(mut self) -> Self {
        self.server_streaming = true;
        self
    }

    /// Mark the method as one-way
    #[must_use]
    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    /// Attach documentation
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Reference to a message type by its fully qualified target-language name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    /// The qualified name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
