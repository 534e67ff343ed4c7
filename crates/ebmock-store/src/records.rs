use chrono::{DateTime, Utc};
use ebmock_schema::{
    ApplicationName, EnvironmentId, EnvironmentName, OptionSetting, OptionSpecification,
    SourceBundle, Tag, Tier, VersionLabel,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Application {
    pub application_name: ApplicationName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    /// Labels of the versions created for this application, in creation order.
    pub versions: Vec<VersionLabel>,
    pub configuration_templates: Vec<String>,
}

impl Application {
    pub fn new(name: ApplicationName, description: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            application_name: name,
            description,
            date_created: now,
            date_updated: now,
            versions: Vec::new(),
            configuration_templates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationVersion {
    pub application_name: ApplicationName,
    pub version_label: VersionLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_bundle: SourceBundle,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EnvironmentStatus {
    Launching,
    Launched,
    Terminating,
    Terminated,
}

impl EnvironmentStatus {
    /// Launching or launched: the environment has not begun terminating.
    pub fn is_live(self) -> bool {
        matches!(self, EnvironmentStatus::Launching | EnvironmentStatus::Launched)
    }
}

impl std::fmt::Display for EnvironmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentStatus::Launching => write!(f, "Launching"),
            EnvironmentStatus::Launched => write!(f, "Launched"),
            EnvironmentStatus::Terminating => write!(f, "Terminating"),
            EnvironmentStatus::Terminated => write!(f, "Terminated"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EnvironmentHealth {
    Grey,
    Green,
}

impl std::fmt::Display for EnvironmentHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentHealth::Grey => write!(f, "Grey"),
            EnvironmentHealth::Green => write!(f, "Green"),
        }
    }
}

/// Stored description of an environment.
///
/// Terminated environments stay in the store; only their status changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    pub environment_id: EnvironmentId,
    pub environment_name: EnvironmentName,
    pub application_name: ApplicationName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_label: Option<VersionLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EnvironmentStatus,
    pub health: EnvironmentHealth,
    pub tier: Tier,
    #[serde(rename = "CNAME")]
    pub cname: String,
    #[serde(rename = "EndpointURL")]
    pub endpoint_url: String,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_stack_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_settings: Option<Vec<OptionSetting>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_to_remove: Option<Vec<OptionSpecification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_application_has_empty_lists() {
        let now = Utc::now();
        let app = Application::new(ApplicationName::new("yeah"), None, now);
        assert!(app.versions.is_empty());
        assert!(app.configuration_templates.is_empty());
        assert_eq!(app.date_created, now);
        assert_eq!(app.date_updated, now);
    }

    #[test]
    fn application_uses_wire_field_names() {
        let app = Application::new(ApplicationName::new("yeah"), Some("d".to_owned()), Utc::now());
        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value["ApplicationName"], "yeah");
        assert_eq!(value["Description"], "d");
        assert!(value["Versions"].as_array().unwrap().is_empty());
        assert!(value["ConfigurationTemplates"].as_array().unwrap().is_empty());
        assert!(value["DateCreated"].is_string());
    }

    #[test]
    fn status_liveness() {
        assert!(EnvironmentStatus::Launching.is_live());
        assert!(EnvironmentStatus::Launched.is_live());
        assert!(!EnvironmentStatus::Terminating.is_live());
        assert!(!EnvironmentStatus::Terminated.is_live());
    }

    #[test]
    fn status_and_health_display() {
        assert_eq!(EnvironmentStatus::Terminating.to_string(), "Terminating");
        assert_eq!(EnvironmentHealth::Green.to_string(), "Green");
        assert_eq!(
            serde_json::to_string(&EnvironmentStatus::Launched).unwrap(),
            "\"Launched\""
        );
    }
}
