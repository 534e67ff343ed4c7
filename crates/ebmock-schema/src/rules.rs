//! Nested-shape validators and whole-object constraints referenced by the
//! schema tables.

use crate::error::ApiError;
use crate::schema::Params;
use crate::stacks::is_known_solution_stack;
use crate::typecheck::{check_type, is_truthy, TypeSpec, TypeTag};
use serde_json::{Map, Value};

fn present(params: &Params, key: &str) -> bool {
    is_truthy(params.get(key))
}

fn display_member(entry: &Map<String, Value>, key: &str) -> String {
    match entry.get(key) {
        None => "undefined".to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn object_list<'a>(
    field: &str,
    value: &'a Value,
) -> Result<Option<&'a Vec<Value>>, ApiError> {
    if !is_truthy(Some(value)) {
        return Ok(None);
    }
    if !check_type(value, TypeSpec::ArrayOf(Some(TypeTag::Object))) {
        return Err(ApiError::invalid_type(format!(
            "Expected params.{field} to be an array of objects"
        )));
    }
    Ok(value.as_array())
}

/// Members that, when given, must be strings. `null` reads as not given.
fn string_members(
    field: &str,
    entry: &Map<String, Value>,
    members: &[&str],
) -> Result<(), ApiError> {
    for member in members {
        if entry.get(*member).is_some_and(|v| !v.is_null() && !v.is_string()) {
            return Err(ApiError::invalid_type(format!(
                "Expected {field}.{member} to be a string"
            )));
        }
    }
    Ok(())
}

/// `OptionSettings` / `OptionsToRemove`: every entry names a namespace and an option.
pub fn option_list(field: &str, value: &Value) -> Result<(), ApiError> {
    let Some(entries) = object_list(field, value)? else {
        return Ok(());
    };
    for entry in entries.iter().filter_map(Value::as_object) {
        if !is_truthy(entry.get("Namespace")) || !is_truthy(entry.get("OptionName")) {
            return Err(ApiError::invalid_value(format!(
                "Invalid parameter value (Namespace: '{}', OptionName: '{}'): Both the \
                 Namespace and the OptionName must be specified and non-empty.",
                display_member(entry, "Namespace"),
                display_member(entry, "OptionName"),
            )));
        }
        string_members(
            field,
            entry,
            &["Namespace", "OptionName", "Value", "ResourceName"],
        )?;
    }
    Ok(())
}

pub fn tag_list(field: &str, value: &Value) -> Result<(), ApiError> {
    let Some(entries) = object_list(field, value)? else {
        return Ok(());
    };
    for entry in entries.iter().filter_map(Value::as_object) {
        if !is_truthy(entry.get("Key")) || !is_truthy(entry.get("Value")) {
            return Err(ApiError::invalid_value(format!(
                "Invalid parameter value (Key: '{}', Value: '{}'): Both the Key and the \
                 Value must be specified and non-empty.",
                display_member(entry, "Key"),
                display_member(entry, "Value"),
            )));
        }
        string_members(field, entry, &["Key", "Value"])?;
    }
    Ok(())
}

pub fn tier(field: &str, value: &Value) -> Result<(), ApiError> {
    if !is_truthy(Some(value)) {
        return Ok(());
    }
    let Some(tier) = value.as_object() else {
        return Err(ApiError::invalid_type(format!(
            "Expected params.{field} to be an object"
        )));
    };
    for member in ["Name", "Type", "Version"] {
        let is_string = tier.get(member).is_some_and(Value::is_string);
        if !is_string {
            return Err(ApiError::invalid_type(format!(
                "Expected {field}.{member} to be a string"
            )));
        }
    }
    Ok(())
}

/// `SourceBundle`: an object whose `S3Bucket` / `S3Key`, when given, are strings.
pub fn source_bundle(field: &str, value: &Value) -> Result<(), ApiError> {
    if !is_truthy(Some(value)) {
        return Ok(());
    }
    let Some(bundle) = value.as_object() else {
        return Err(ApiError::invalid_type(format!(
            "Expected params.{field} to be an object"
        )));
    };
    for member in ["S3Bucket", "S3Key"] {
        if bundle.get(member).is_some_and(|v| !v.is_string()) {
            return Err(ApiError::invalid_type(format!(
                "Expected {field}.{member} to be a string"
            )));
        }
    }
    Ok(())
}

pub fn solution_stack(_field: &str, value: &Value) -> Result<(), ApiError> {
    match value.as_str() {
        Some(name) if is_known_solution_stack(name) => Ok(()),
        Some(name) => Err(ApiError::invalid_value(format!(
            "No Solution Stack named '{name}' found."
        ))),
        None => Err(ApiError::invalid_value(format!(
            "No Solution Stack named '{value}' found."
        ))),
    }
}

/// Exactly one of `TemplateName` and `SolutionStackName`.
pub fn create_environment(params: &Params) -> Result<(), ApiError> {
    let template = present(params, "TemplateName");
    let solution = present(params, "SolutionStackName");
    if template && solution {
        return Err(ApiError::invalid_combination(
            "Cannot specify both Configuration Template Name and Solution Stack Name.",
        ));
    }
    if !template && !solution {
        return Err(ApiError::missing_parameter(
            "You must specify either Configuration Template name or Solution Stack name.",
        ));
    }
    Ok(())
}

/// An environment reference is required, and a version change cannot ride
/// along with a configuration change.
pub fn update_environment(params: &Params) -> Result<(), ApiError> {
    if !present(params, "EnvironmentName") && !present(params, "EnvironmentId") {
        return Err(ApiError::missing_required(
            "You must specify either EnvironmentName or EnvironmentId.",
        ));
    }
    let reconfigures = [
        "OptionSettings",
        "OptionsToRemove",
        "TemplateName",
        "Tier",
        "Description",
    ]
    .iter()
    .any(|key| present(params, key));
    if present(params, "VersionLabel") && reconfigures {
        return Err(ApiError::invalid_combination(
            "Cannot change both the release and configuration.",
        ));
    }
    Ok(())
}

pub fn terminate_environment(params: &Params) -> Result<(), ApiError> {
    if !present(params, "EnvironmentId") && !present(params, "EnvironmentName") {
        return Err(ApiError::missing_required(
            "Requires either EnvironmentName or EnvironmentId",
        ));
    }
    Ok(())
}

/// Source and destination are addressed the same way: IDs come as a pair,
/// names come as a pair, and at least one pair is given.
pub fn swap_environment_cnames(params: &Params) -> Result<(), ApiError> {
    let ids = (
        present(params, "SourceEnvironmentId"),
        present(params, "DestinationEnvironmentId"),
    );
    let names = (
        present(params, "SourceEnvironmentName"),
        present(params, "DestinationEnvironmentName"),
    );
    if ids.0 != ids.1 {
        return Err(ApiError::invalid_value("Both EnvironmentIds must be given"));
    }
    if names.0 != names.1 {
        return Err(ApiError::invalid_value(
            "Both EnvironmentNames must be given",
        ));
    }
    if !ids.0 && !names.0 {
        return Err(ApiError::invalid_value(
            "Source and destination environments must be given by name or by id",
        ));
    }
    Ok(())
}
