//! Error types for rsocket-rpc-codegen
//!
//! Two tiers:
//! - Structural: a service descriptor that cannot be planned
//!   (`InvalidIdentifier`, `DuplicateRoute`). These abort generation for the
//!   offending service only.
//! - Ambient: template, configuration, serialization and I/O failures raised
//!   by the rendering layer and the CLI harness.

use thiserror::Error;

/// Result type for code generation operations
pub type CodegenResult<T> = std::result::Result<T, CodegenError>;

/// Main error type for rsocket-rpc-codegen
///
/// Structural errors are never recovered locally. They carry enough context
/// (service, identifier, rule) for a harness to report them and move on to
/// the next service.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CodegenError {
    /// A method or service name cannot be turned into identifiers
    #[error("Invalid identifier '{identifier}'{}: {reason}", in_service(.service.as_deref()))]
    InvalidIdentifier {
        identifier: String,
        reason: String,
        service: Option<String>,
    },

    /// Two methods of one service derive the same route key
    #[error(
        "Duplicate route '{route_key}' in service '{service}': methods '{first}' and '{second}' collide"
    )]
    DuplicateRoute {
        service: String,
        route_key: String,
        first: String,
        second: String,
    },

    /// Template registration or rendering failed
    #[error("Template error: {message}")]
    Template {
        message: String,
        template: Option<String>,
    },

    /// Invalid render configuration or command-line input
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        key: Option<String>,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn in_service(service: Option<&str>) -> String {
    service
        .map(|s| format!(" in service '{s}'"))
        .unwrap_or_default()
}

impl CodegenError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
            service: None,
        }
    }

    /// Create a duplicate route error
    pub fn duplicate_route(
        service: impl Into<String>,
        route_key: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateRoute {
            service: service.into(),
            route_key: route_key.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
            template: None,
        }
    }

    /// Create a template error naming the template involved
    pub fn template_with_name(message: impl Into<String>, template: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
            template: Some(template.into()),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: None,
        }
    }

    /// Create a configuration error with key context
    pub fn configuration_with_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Attach the offending service to an identifier error.
    ///
    /// Other variants are returned unchanged: `DuplicateRoute` always names its
    /// service, and ambient errors are not tied to one.
    #[must_use]
    pub fn with_service(self, name: &str) -> Self {
        match self {
            Self::InvalidIdentifier {
                identifier,
                reason,
                service: None,
            } => Self::InvalidIdentifier {
                identifier,
                reason,
                service: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// Service the error belongs to, if known
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::InvalidIdentifier { service, .. } => service.as_deref(),
            Self::DuplicateRoute { service, .. } => Some(service),
            _ => None,
        }
    }

    /// Whether the error stems from the descriptor itself rather than from
    /// the environment (templates, config, filesystem)
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::DuplicateRoute { .. }
        )
    }

    /// Short name of the rule that was violated, for reports
    #[must_use]
    pub fn rule(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "InvalidIdentifier",
            Self::DuplicateRoute { .. } => "DuplicateRoute",
            Self::Template { .. } => "Template",
            Self::Configuration { .. } => "Configuration",
            Self::Serialization(_) => "Serialization",
            Self::Io(_) => "Io",
        }
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

impl From<handlebars::RenderError> for CodegenError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_display() {
        let err = CodegenError::invalid_identifier("", "identifier cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid identifier '': identifier cannot be empty"
        );

        let err = err.with_service("EchoService");
        assert_eq!(
            err.to_string(),
            "Invalid identifier '' in service 'EchoService': identifier cannot be empty"
        );
        assert_eq!(err.service(), Some("EchoService"));
    }

    #[test]
    fn test_duplicate_route_display() {
        let err = CodegenError::duplicate_route(
            "EchoService",
            "io.example.EchoService.METHOD_ECHO",
            "Echo",
            "Echo",
        );
        let msg = err.to_string();
        assert!(msg.contains("io.example.EchoService.METHOD_ECHO"));
        assert!(msg.contains("'Echo' and 'Echo'"));
        assert!(err.is_structural());
        assert_eq!(err.rule(), "DuplicateRoute");
    }

    #[test]
    fn test_with_service_keeps_existing_service() {
        let err = CodegenError::InvalidIdentifier {
            identifier: "a-b".to_string(),
            reason: "bad".to_string(),
            service: Some("First".to_string()),
        }
        .with_service("Second");
        assert_eq!(err.service(), Some("First"));
    }

    #[test]
    fn test_ambient_errors_are_not_structural() {
        let err = CodegenError::template_with_name("boom", "server");
        assert!(!err.is_structural());
        assert_eq!(err.service(), None);

        let err = CodegenError::configuration_with_key("bad value", "metrics");
        assert!(matches!(
            err,
            CodegenError::Configuration { key: Some(ref k), .. } if k == "metrics"
        ));
    }
}
