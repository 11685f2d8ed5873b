//! Identifier derivation
//!
//! Pure string transformations turning a schema-cased method name into the
//! identifiers generated code needs: the lower-camel method name, the
//! `METHOD_`/`ROUTE_` constant names and the route key used for dispatch.
//!
//! Inputs are validated before any transformation. A name is accepted when it
//! is non-empty, made only of ASCII letters, digits and `_`, and contains at
//! least one letter or digit. Length is not limited.
//!
//! # Casing rules
//!
//! [`to_lower_camel`] and [`to_screaming_snake`] are deliberately not inverse
//! of each other. Upper-snake only inserts a delimiter at a lowercase to
//! uppercase transition, so runs of capitals stay glued together:
//!
//! ```
//! use rsocket_rpc_codegen::codegen::identifiers::{to_lower_camel, to_screaming_snake};
//!
//! assert_eq!(to_screaming_snake("getUser").unwrap(), "GET_USER");
//! assert_eq!(to_screaming_snake("get_user").unwrap(), "GET_USER");
//! assert_eq!(to_screaming_snake("HTTPServer").unwrap(), "HTTPSERVER");
//! assert_eq!(to_lower_camel("get_user").unwrap(), "getUser");
//! assert_eq!(to_lower_camel("GetUser").unwrap(), "getUser");
//! ```

use serde::{Deserialize, Serialize};

use crate::descriptor::ServiceDefinition;
use crate::error::{CodegenError, CodegenResult};

/// Prefix of the constant holding a method's raw name
pub const METHOD_CONSTANT_PREFIX: &str = "METHOD_";

/// Prefix of the constant holding a method's full route
pub const ROUTE_CONSTANT_PREFIX: &str = "ROUTE_";

/// Check that a schema name can be transformed into identifiers
///
/// # Errors
///
/// Returns `CodegenError::InvalidIdentifier` naming the first rule the input
/// breaks.
pub fn validate_identifier(name: &str) -> CodegenResult<()> {
    if name.is_empty() {
        return Err(CodegenError::invalid_identifier(
            name,
            "identifier cannot be empty",
        ));
    }

    if let Some((pos, ch)) = name
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(CodegenError::invalid_identifier(
            truncate_for_display(name, 50),
            format!("contains invalid character {ch:?} at position {pos}"),
        ));
    }

    if !name.bytes().any(|b| b.is_ascii_alphanumeric()) {
        return Err(CodegenError::invalid_identifier(
            name,
            "identifier contains no letters or digits",
        ));
    }

    Ok(())
}

/// Lower-camel form, used as the generated method name
///
/// The first character is decapitalised. Every later `_` is removed and the
/// character following it is capitalised; a trailing `_` simply disappears.
/// A leading `_` is kept as is, which makes the transformation idempotent.
///
/// # Errors
///
/// Returns `CodegenError::InvalidIdentifier` if `name` fails
/// [`validate_identifier`].
pub fn to_lower_camel(name: &str) -> CodegenResult<String> {
    validate_identifier(name)?;

    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_lowercase());
    }

    let mut after_underscore = false;
    for ch in chars {
        if ch == '_' {
            after_underscore = true;
        } else {
            out.push(if after_underscore {
                ch.to_ascii_uppercase()
            } else {
                ch
            });
            after_underscore = false;
        }
    }

    Ok(out)
}

/// Upper-snake form, used for generated constant names
///
/// Every character is uppercased, and `_` is inserted between a lowercase
/// letter and an immediately following uppercase letter. Existing
/// underscores are kept and never doubled.
///
/// # Errors
///
/// Returns `CodegenError::InvalidIdentifier` if `name` fails
/// [`validate_identifier`].
pub fn to_screaming_snake(name: &str) -> CodegenResult<String> {
    validate_identifier(name)?;

    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &b) in bytes.iter().enumerate() {
        out.push(char::from(b.to_ascii_uppercase()));
        if let Some(&next) = bytes.get(i + 1) {
            if b.is_ascii_lowercase() && next.is_ascii_uppercase() {
                out.push('_');
            }
        }
    }

    Ok(out)
}

/// `METHOD_<NAME>` constant name
///
/// # Errors
///
/// Returns `CodegenError::InvalidIdentifier` for invalid method names.
pub fn method_constant(name: &str) -> CodegenResult<String> {
    Ok(format!("{METHOD_CONSTANT_PREFIX}{}", to_screaming_snake(name)?))
}

/// `ROUTE_<NAME>` constant name
///
/// # Errors
///
/// Returns `CodegenError::InvalidIdentifier` for invalid method names.
pub fn route_constant(name: &str) -> CodegenResult<String> {
    Ok(format!("{ROUTE_CONSTANT_PREFIX}{}", to_screaming_snake(name)?))
}

/// Service identifier: namespace path and service name joined with `.`
///
/// # Errors
///
/// Returns `CodegenError::InvalidIdentifier` if the service name is invalid.
pub fn service_identifier(service: &ServiceDefinition) -> CodegenResult<String> {
    validate_identifier(&service.name).map_err(|e| e.with_service(&service.name))?;

    let mut id = service
        .namespace
        .iter()
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut acc, segment| {
            acc.push_str(segment);
            acc.push('.');
            acc
        });
    id.push_str(&service.name);
    Ok(id)
}

/// All identifiers derived from one method name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodIdentifiers {
    /// Raw schema name
    pub raw: String,

    /// Generated method name
    pub lower_camel: String,

    /// `METHOD_<NAME>`
    pub method_constant: String,

    /// `ROUTE_<NAME>`
    pub route_constant: String,

    /// `<service id>.METHOD_<NAME>`, unique within a service
    pub route_key: String,

    /// `<service id>.<raw name>`, the value carried on the wire
    pub wire_route: String,
}

impl MethodIdentifiers {
    /// Derive every identifier for `method_name` inside service `service_id`
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::InvalidIdentifier` if the method name is invalid.
    pub fn derive(service_id: &str, method_name: &str) -> CodegenResult<Self> {
        let lower_camel = to_lower_camel(method_name)?;
        let screaming = to_screaming_snake(method_name)?;

        Ok(Self {
            raw: method_name.to_string(),
            lower_camel,
            method_constant: format!("{METHOD_CONSTANT_PREFIX}{screaming}"),
            route_constant: format!("{ROUTE_CONSTANT_PREFIX}{screaming}"),
            route_key: format!("{service_id}.{METHOD_CONSTANT_PREFIX}{screaming}"),
            wire_route: format!("{service_id}.{method_name}"),
        })
    }
}

/// Truncate a string for safe display in error messages
fn truncate_for_display(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
