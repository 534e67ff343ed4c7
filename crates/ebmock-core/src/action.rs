//! Name-based routing of requests to engine operations.

use crate::engine::Engine;
use crate::responses::{Empty, Response};
use crate::CoreError;
use ebmock_schema::{ApiError, Operation, Params};
use std::fmt;
use std::str::FromStr;

/// Operations of the service that are accepted but not modeled. Each one
/// succeeds with an empty result.
pub const UNSUPPORTED_OPERATIONS: [&str; 17] = [
    "checkDNSAvailability",
    "createConfigurationTemplate",
    "createStorageLocation",
    "deleteApplicationVersion",
    "deleteConfigurationTemplate",
    "deleteEnvironmentConfiguration",
    "describeEvents",
    "describeConfigurationOptions",
    "describeConfigurationSettings",
    "describeEnvironmentResource",
    "rebuildEnvironment",
    "retrieveEnvironmentInfo",
    "requestEnvironmentInfo",
    "restartAppServer",
    "updateConfigurationTemplate",
    "updateApplicationVersion",
    "validateConfigurationSettings",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Modeled(Operation),
    Unsupported(&'static str),
    CreateBucket,
    PutObject,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Modeled(op) => op.name(),
            Action::Unsupported(name) => name,
            Action::CreateBucket => "createBucket",
            Action::PutObject => "putObject",
        }
    }

    /// Every accepted action: modeled operations, bucket actions, then stubs.
    pub fn all() -> impl Iterator<Item = Action> {
        Operation::ALL
            .into_iter()
            .map(Action::Modeled)
            .chain([Action::CreateBucket, Action::PutObject])
            .chain(UNSUPPORTED_OPERATIONS.into_iter().map(Action::Unsupported))
    }

    pub fn is_modeled(self) -> bool {
        matches!(self, Action::Modeled(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::all()
            .find(|a| a.name() == s)
            .ok_or_else(|| CoreError::UnknownAction(s.to_owned()))
    }
}

impl Engine {
    /// Run one action and return its result body.
    pub fn execute(&mut self, action: Action, params: &Params) -> Result<Response, ApiError> {
        let response: Response = match action {
            Action::Modeled(op) => match op {
                Operation::CreateApplication => self.create_application(params)?.into(),
                Operation::UpdateApplication => self.update_application(params)?.into(),
                Operation::DeleteApplication => self.delete_application(params)?.into(),
                Operation::DescribeApplications => self.describe_applications(params)?.into(),
                Operation::CreateApplicationVersion => {
                    self.create_application_version(params)?.into()
                }
                Operation::CreateEnvironment => self.create_environment(params)?.into(),
                Operation::DescribeEnvironments => self.describe_environments(params)?.into(),
                Operation::UpdateEnvironment => self.update_environment(params)?.into(),
                Operation::TerminateEnvironment => self.terminate_environment(params)?.into(),
                Operation::SwapEnvironmentCnames => self.swap_environment_cnames(params)?.into(),
            },
            Action::Unsupported(_) => {
                self.run_pending();
                Empty {}.into()
            }
            Action::CreateBucket => self.create_bucket(params)?.into(),
            Action::PutObject => self.put_object(params)?.into(),
        };
        Ok(response)
    }
}
