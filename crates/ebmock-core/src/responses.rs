use ebmock_store::{Application, ApplicationVersion, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationDescriptionMessage {
    pub application: Application,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationDescriptionsMessage {
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationVersionDescriptionMessage {
    pub application_version: ApplicationVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentDescriptionsMessage {
    pub environments: Vec<Environment>,
}

/// Success with nothing to report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Result body of any action, serialized without a wrapper tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Application(ApplicationDescriptionMessage),
    Applications(ApplicationDescriptionsMessage),
    ApplicationVersion(ApplicationVersionDescriptionMessage),
    Environment(Box<Environment>),
    Environments(EnvironmentDescriptionsMessage),
    Empty(Empty),
}

impl Response {
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn environment(&self) -> Option<&Environment> {
        match self {
            Response::Environment(env) => Some(env),
            _ => None,
        }
    }
}

impl From<ApplicationDescriptionMessage> for Response {
    fn from(m: ApplicationDescriptionMessage) -> Self {
        Response::Application(m)
    }
}

impl From<ApplicationDescriptionsMessage> for Response {
    fn from(m: ApplicationDescriptionsMessage) -> Self {
        Response::Applications(m)
    }
}

impl From<ApplicationVersionDescriptionMessage> for Response {
    fn from(m: ApplicationVersionDescriptionMessage) -> Self {
        Response::ApplicationVersion(m)
    }
}

impl From<Environment> for Response {
    fn from(env: Environment) -> Self {
        Response::Environment(Box::new(env))
    }
}

impl From<EnvironmentDescriptionsMessage> for Response {
    fn from(m: EnvironmentDescriptionsMessage) -> Self {
        Response::Environments(m)
    }
}

impl From<Empty> for Response {
    fn from(e: Empty) -> Self {
        Response::Empty(e)
    }
}
