//! Schema-driven request validation.
//!
//! Checks run in a fixed order and the first failure is returned:
//! the whole-object constraint, then each supplied parameter in request order
//! (known key, pattern, length, nested shape, declared type), then required
//! fields, and finally the caller's domain check.

use crate::error::ApiError;
use crate::schema::{schema, FieldKind, FieldSpec, Operation, Params};
use crate::typecheck::{check_type, is_truthy};
use serde_json::Value;

/// Validate `params` against the schema of `operation`.
pub fn validate(operation: Operation, params: &Params) -> Result<(), ApiError> {
    validate_with(operation, params, || Ok(()))
}

/// Validate `params`, then run `domain_check` if every structural check passed.
///
/// The domain check carries business rules that need store access, such as
/// "the application must not exist yet".
pub fn validate_with<F>(operation: Operation, params: &Params, domain_check: F) -> Result<(), ApiError>
where
    F: FnOnce() -> Result<(), ApiError>,
{
    let schema = schema(operation);

    if let Some(constraint) = schema.constraint {
        constraint(params)?;
    }

    for (key, value) in params {
        let Some(field) = schema.field(key) else {
            return Err(ApiError::unexpected(format!(
                "Unexpected key '{key}' found in params"
            )));
        };
        check_field(field, value)?;
    }

    if let Some(field) = schema
        .required_fields()
        .find(|f| !is_truthy(params.get(f.name)))
    {
        return Err(ApiError::missing_required(format!(
            "Missing required key '{}' in params",
            field.name
        )));
    }

    domain_check()
}

fn check_field(field: &FieldSpec, value: &Value) -> Result<(), ApiError> {
    let key = field.name;

    if let Some(pattern) = &field.pattern {
        if !value.as_str().is_some_and(|s| pattern.regex.is_match(s)) {
            return Err(ApiError::invalid_value(format!(
                "Value {} at '{key}' failed to satisfy constraint: {}",
                render(value),
                pattern.description
            )));
        }
    }

    if let Some(len) = length_of(value) {
        if let Some(min) = field.min.filter(|&min| len < min) {
            return Err(ApiError::validation(format!(
                "1 validation error detected: Value {} at '{key}' failed to satisfy \
                 constraint: Member must have length greater than or equal to {min}",
                render(value)
            )));
        }
        if let Some(max) = field.max.filter(|&max| len > max) {
            return Err(ApiError::validation(format!(
                "1 validation error detected: Value {} at '{key}' failed to satisfy \
                 constraint: Member must have length less than or equal to {max}",
                render(value)
            )));
        }
    }

    match field.kind {
        FieldKind::Nested(check) => check(key, value),
        FieldKind::Typed(spec) if !check_type(value, spec) => Err(ApiError::invalid_type(
            format!("Expected params.{key} to be a {}", spec.name().to_lowercase()),
        )),
        FieldKind::Typed(_) | FieldKind::Untyped => Ok(()),
    }
}

/// Length in characters for strings and in elements for arrays.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
