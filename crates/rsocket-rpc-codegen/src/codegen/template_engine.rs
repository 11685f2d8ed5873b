//! Template engine for code generation
//!
//! This module provides a Handlebars-based template engine that renders the
//! blocking Java interface, client and server sources.

use handlebars::Handlebars;
use serde::Serialize;

use super::plan::ArtifactKind;
use crate::config::TemplateOverrides;
use crate::error::{CodegenError, CodegenResult};

/// Template engine for rendering Java sources
///
/// Uses Handlebars templates embedded in the binary via `include_str!`, any of
/// which can be replaced by a template file. Output is never HTML-escaped.
/// Symbolic names are spelled out with the `sym` helper, which resolves
/// them through the context's `symbols` table.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Create a new template engine with the embedded templates
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Template` if an embedded template fails to
    /// register.
    pub fn new() -> CodegenResult<Self> {
        Self::with_overrides(&TemplateOverrides::default())
    }

    /// Create a template engine, replacing embedded templates by files
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Io` if an override file cannot be read and
    /// `CodegenError::Template` if a template fails to register.
    pub fn with_overrides(overrides: &TemplateOverrides) -> CodegenResult<Self> {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);

        for artifact in ArtifactKind::ALL {
            let name = artifact.template_name();
            let source = match overrides.get(artifact) {
                Some(path) => {
                    tracing::debug!(template = name, path = %path.display(), "using template override");
                    std::fs::read_to_string(path)?
                }
                None => embedded_template(artifact).to_string(),
            };

            hb.register_template_string(name, source).map_err(|e| {
                CodegenError::template_with_name(
                    format!("Failed to register {name} template: {e}"),
                    name,
                )
            })?;
        }

        hb.register_helper("sym", Box::new(sym_helper));

        Ok(Self { handlebars: hb })
    }

    /// Render the template of one artifact
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Template` if rendering fails, including unknown
    /// symbols.
    pub fn render(&self, artifact: ArtifactKind, context: &impl Serialize) -> CodegenResult<String> {
        let name = artifact.template_name();
        self.handlebars.render(name, context).map_err(|e| {
            CodegenError::template_with_name(format!("Failed to render {name}: {e}"), name)
        })
    }
}

fn embedded_template(artifact: ArtifactKind) -> &'static str {
    match artifact {
        ArtifactKind::Interface => include_str!("templates/interface.java.hbs"),
        ArtifactKind::ClientStub => include_str!("templates/client.java.hbs"),
        ArtifactKind::ServerStub => include_str!("templates/server.java.hbs"),
    }
}

fn lookup_symbol<'a>(symbols: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    let table = symbols.as_object()?;
    table
        .get(name)
        .or_else(|| {
            table
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .and_then(serde_json::Value::as_str)
}

fn sym_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    ctx: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> Result<(), handlebars::RenderError> {
    let param = h.param(0).ok_or_else(|| {
        handlebars::RenderError::from(handlebars::RenderErrorReason::Other(
            "sym requires one parameter".to_string(),
        ))
    })?;

    let name = param.value().as_str().ok_or_else(|| {
        handlebars::RenderError::from(handlebars::RenderErrorReason::Other(
            "sym parameter must be a string".to_string(),
        ))
    })?;

    let resolved = ctx
        .data()
        .get("symbols")
        .and_then(|symbols| lookup_symbol(symbols, name))
        .ok_or_else(|| {
            handlebars::RenderError::from(handlebars::RenderErrorReason::Other(format!(
                "unknown symbol '{name}'"
            )))
        })?;

    out.write(resolved)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_template_engine_creation() {
        let engine = TemplateEngine::new();
        assert!(
            engine.is_ok(),
            "Template engine should be created successfully"
        );
    }

    #[test]
    fn test_sym_helper_and_no_escape() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{{{sym \"Flux\"}}}}<{{{{name}}}}> & more").unwrap();

        let overrides = TemplateOverrides {
            interface: Some(file.path().to_path_buf()),
            ..TemplateOverrides::default()
        };
        let engine = TemplateEngine::with_overrides(&overrides).unwrap();

        let out = engine
            .render(ArtifactKind::Interface, &json!({
                "name": "A<B>",
                "symbols": {"Flux": "reactor.core.publisher.Flux"}
            }))
            .unwrap();
        assert_eq!(out, "reactor.core.publisher.Flux<A<B>> & more");
    }

    #[test]
    fn test_unknown_symbol_is_template_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{{{sym \"Nope\"}}}}").unwrap();

        let overrides = TemplateOverrides {
            client: Some(file.path().to_path_buf()),
            ..TemplateOverrides::default()
        };
        let engine = TemplateEngine::with_overrides(&overrides).unwrap();

        let err = engine
            .render(ArtifactKind::ClientStub, &json!({"symbols": {}}))
            .unwrap_err();
        match err {
            CodegenError::Template { message, template } => {
                assert!(message.contains("unknown symbol 'Nope'"), "{message}");
                assert_eq!(template.as_deref(), Some("client"));
            }
            other => panic!("expected template error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_override_is_io_error() {
        let overrides = TemplateOverrides {
            server: Some("/no/such/template.hbs".into()),
            ..TemplateOverrides::default()
        };
        let err = TemplateEngine::with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }

    #[test]
    fn test_invalid_override_is_template_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{{{#if x}}}}never closed").unwrap();

        let overrides = TemplateOverrides {
            server: Some(file.path().to_path_buf()),
            ..TemplateOverrides::default()
        };
        let err = TemplateEngine::with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, CodegenError::Template { .. }));
    }

    #[test]
    fn test_symbol_lookup_falls_back_to_case_insensitive() {
        let symbols = json!({"flux": "reactor.core.publisher.Flux"});
        assert_eq!(lookup_symbol(&symbols, "Flux"), Some("reactor.core.publisher.Flux"));
        assert_eq!(lookup_symbol(&symbols, "Mono"), None);
    }
}
