use serde::{Deserialize, Serialize};

/// A configuration option to set on an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionSetting {
    pub namespace: String,
    pub option_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
}

/// A configuration option to remove from an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionSpecification {
    pub namespace: String,
    pub option_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Environment tier. Environments created without one get the web-server tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tier {
    pub name: String,
    #[serde(rename = "Type")]
    pub tier_type: String,
    pub version: String,
}

impl Default for Tier {
    fn default() -> Self {
        Self {
            name: "WebServer".to_owned(),
            tier_type: "Standard".to_owned(),
            version: "1.0".to_owned(),
        }
    }
}

/// Location of a version's source archive. Both parts are optional; a version
/// created without a bundle stores an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBundle {
    #[serde(rename = "S3Bucket", default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,
    #[serde(rename = "S3Key", default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_tier_is_standard_web_server() {
        let value = serde_json::to_value(Tier::default()).unwrap();
        assert_eq!(
            value,
            json!({ "Name": "WebServer", "Type": "Standard", "Version": "1.0" })
        );
    }

    #[test]
    fn empty_source_bundle_serializes_to_empty_object() {
        let value = serde_json::to_value(SourceBundle::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn option_setting_reads_wire_names() {
        let setting: OptionSetting = serde_json::from_value(json!({
            "Namespace": "aws:autoscaling:asg",
            "OptionName": "MinSize",
            "Value": "2"
        }))
        .unwrap();
        assert_eq!(setting.namespace, "aws:autoscaling:asg");
        assert_eq!(setting.option_name, "MinSize");
        assert_eq!(setting.value.as_deref(), Some("2"));
        assert!(setting.resource_name.is_none());
    }
}
