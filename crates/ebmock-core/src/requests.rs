//! Typed views of validated request parameters.
//!
//! Parameters are validated as raw JSON first; only then are they decoded
//! into these structs. Every shape the validator admits decodes.

use ebmock_schema::{
    is_truthy, schema, ApiError, ApplicationName, EnvironmentName, FieldKind, Operation,
    OptionSetting, OptionSpecification, Params, SourceBundle, Tag, Tier, VersionLabel,
};
use ebmock_store::EnvironmentKey;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub(crate) fn decode<T: DeserializeOwned>(operation: Operation, params: &Params) -> Result<T, ApiError> {
    let schema = schema(operation);
    let mut params = params.clone();
    // Nested shapes are only checked when truthy; anything else is absent.
    params.retain(|key, value| {
        is_truthy(Some(&*value))
            || !schema
                .field(key)
                .is_some_and(|f| matches!(f.kind, FieldKind::Nested(_)))
    });
    serde_json::from_value(Value::Object(params)).map_err(|e| {
        ApiError::invalid_type(format!("Invalid parameters for {operation}: {e}"))
    })
}

/// Non-empty string parameter, used where an empty value means "not given".
fn given(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationInput {
    pub application_name: ApplicationName,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteApplicationInput {
    pub application_name: ApplicationName,
    #[serde(default)]
    pub terminate_env_by_force: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeApplicationsInput {
    #[serde(default)]
    pub application_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateApplicationVersionInput {
    pub application_name: ApplicationName,
    pub version_label: VersionLabel,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_bundle: Option<SourceBundle>,
    #[serde(default)]
    pub auto_create_application: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateEnvironmentInput {
    pub application_name: ApplicationName,
    pub environment_name: EnvironmentName,
    #[serde(rename = "CNAMEPrefix", default)]
    pub cname_prefix: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub option_settings: Option<Vec<OptionSetting>>,
    #[serde(default)]
    pub options_to_remove: Option<Vec<OptionSpecification>>,
    #[serde(default)]
    pub solution_stack_name: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub version_label: Option<VersionLabel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeEnvironmentsInput {
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub environment_ids: Option<Vec<String>>,
    #[serde(default)]
    pub environment_names: Option<Vec<String>>,
    #[serde(default)]
    pub version_label: Option<String>,
    #[serde(default)]
    pub include_deleted: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateEnvironmentInput {
    #[serde(default)]
    pub environment_id: Option<String>,
    #[serde(default)]
    pub environment_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub option_settings: Option<Vec<OptionSetting>>,
    #[serde(default)]
    pub options_to_remove: Option<Vec<OptionSpecification>>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub version_label: Option<VersionLabel>,
}

impl UpdateEnvironmentInput {
    /// Lookup keys, id first.
    pub fn keys(&self) -> Vec<EnvironmentKey<'_>> {
        id_then_name(self.environment_id.as_ref(), self.environment_name.as_ref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TerminateEnvironmentInput {
    #[serde(default)]
    pub environment_id: Option<String>,
    #[serde(default)]
    pub environment_name: Option<String>,
    /// Accepted for compatibility; resources are never modeled.
    #[serde(default)]
    pub terminate_resources: Option<bool>,
}

impl TerminateEnvironmentInput {
    pub fn keys(&self) -> Vec<EnvironmentKey<'_>> {
        id_then_name(self.environment_id.as_ref(), self.environment_name.as_ref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwapEnvironmentCnamesInput {
    #[serde(default)]
    pub source_environment_id: Option<String>,
    #[serde(default)]
    pub source_environment_name: Option<String>,
    #[serde(default)]
    pub destination_environment_id: Option<String>,
    #[serde(default)]
    pub destination_environment_name: Option<String>,
}

impl SwapEnvironmentCnamesInput {
    /// Source lookup keys, name first.
    pub fn source_keys(&self) -> Vec<EnvironmentKey<'_>> {
        name_then_id(
            self.source_environment_name.as_ref(),
            self.source_environment_id.as_ref(),
        )
    }

    pub fn destination_keys(&self) -> Vec<EnvironmentKey<'_>> {
        name_then_id(
            self.destination_environment_name.as_ref(),
            self.destination_environment_id.as_ref(),
        )
    }
}

fn id_then_name<'a>(id: Option<&'a String>, name: Option<&'a String>) -> Vec<EnvironmentKey<'a>> {
    given(id)
        .map(EnvironmentKey::Id)
        .into_iter()
        .chain(given(name).map(EnvironmentKey::Name))
        .collect()
}

fn name_then_id<'a>(name: Option<&'a String>, id: Option<&'a String>) -> Vec<EnvironmentKey<'a>> {
    given(name)
        .map(EnvironmentKey::Name)
        .into_iter()
        .chain(given(id).map(EnvironmentKey::Id))
        .collect()
}

/// Parameters of the bucket actions. These are not schema-checked.
#[derive(Debug, Deserialize)]
pub struct CreateBucketInput {
    #[serde(rename = "Bucket")]
    pub bucket: String,
}

#[derive(Debug, Deserialize)]
pub struct PutObjectInput {
    #[serde(rename = "Bucket")]
    pub bucket: String,
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Body", default)]
    pub body: Option<Value>,
}

impl PutObjectInput {
    /// Object bytes: strings are stored as UTF-8, anything else as its JSON text.
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => s.as_bytes().to_vec(),
            Some(other) => other.to_string().into_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn decodes_create_environment() {
        let input: CreateEnvironmentInput = decode(
            Operation::CreateEnvironment,
            &params(json!({
                "ApplicationName": "myapp",
                "EnvironmentName": "myenv",
                "CNAMEPrefix": "myprefix",
                "Tier": { "Name": "Worker", "Type": "SQS/HTTP", "Version": "1.0" }
            })),
        )
        .unwrap();
        assert_eq!(input.application_name, "myapp");
        assert_eq!(input.cname_prefix.as_deref(), Some("myprefix"));
        assert_eq!(input.tier.unwrap().name, "Worker");
        assert!(input.tags.is_none());
    }

    #[test]
    fn falsy_nested_shapes_decode_as_absent() {
        let input: CreateEnvironmentInput = decode(
            Operation::CreateEnvironment,
            &params(json!({
                "ApplicationName": "myapp",
                "EnvironmentName": "myenv",
                "Tier": "",
                "Tags": false,
                "OptionSettings": 0
            })),
        )
        .unwrap();
        assert!(input.tier.is_none());
        assert!(input.tags.is_none());
        assert!(input.option_settings.is_none());
    }

    #[test]
    fn update_keys_prefer_id() {
        let input: UpdateEnvironmentInput = decode(
            Operation::UpdateEnvironment,
            &params(json!({ "EnvironmentName": "myenv", "EnvironmentId": "e-abcdefghij" })),
        )
        .unwrap();
        assert_eq!(
            input.keys(),
            vec![
                EnvironmentKey::Id("e-abcdefghij"),
                EnvironmentKey::Name("myenv")
            ]
        );
    }

    #[test]
    fn empty_reference_is_skipped() {
        let input: TerminateEnvironmentInput = decode(
            Operation::TerminateEnvironment,
            &params(json!({ "EnvironmentId": "", "EnvironmentName": "myenv" })),
        )
        .unwrap();
        assert_eq!(input.keys(), vec![EnvironmentKey::Name("myenv")]);
    }

    #[test]
    fn swap_keys_prefer_name() {
        let input: SwapEnvironmentCnamesInput = decode(
            Operation::SwapEnvironmentCnames,
            &params(json!({
                "SourceEnvironmentId": "e-aaaaaaaaaa",
                "SourceEnvironmentName": "src",
                "DestinationEnvironmentId": "e-bbbbbbbbbb",
                "DestinationEnvironmentName": "dst"
            })),
        )
        .unwrap();
        assert_eq!(
            input.source_keys(),
            vec![EnvironmentKey::Name("src"), EnvironmentKey::Id("e-aaaaaaaaaa")]
        );
        assert_eq!(input.destination_keys()[0], EnvironmentKey::Name("dst"));
    }

    #[test]
    fn object_bodies() {
        let text: PutObjectInput =
            serde_json::from_value(json!({ "Bucket": "b", "Key": "k", "Body": "zip" })).unwrap();
        assert_eq!(text.body_bytes(), b"zip");
        let empty: PutObjectInput =
            serde_json::from_value(json!({ "Bucket": "b", "Key": "k" })).unwrap();
        assert!(empty.body_bytes().is_empty());
        let json_body: PutObjectInput =
            serde_json::from_value(json!({ "Bucket": "b", "Key": "k", "Body": [1, 2] })).unwrap();
        assert_eq!(json_body.body_bytes(), b"[1,2]");
    }
}
