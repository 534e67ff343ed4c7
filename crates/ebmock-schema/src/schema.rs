//! Static per-operation parameter schemas.
//!
//! Each modeled operation has one [`Schema`]: an ordered table of field
//! descriptors plus an optional whole-object constraint. Schemas are built once
//! per process and shared by reference.

use crate::error::ApiError;
use crate::rules;
use crate::typecheck::{TypeSpec, TypeTag};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Request parameters as received from a caller.
pub type Params = Map<String, Value>;

/// Validator for a nested field shape. Receives the field name and its value.
pub type NestedCheck = fn(&str, &Value) -> Result<(), ApiError>;

/// Constraint spanning several fields of one request.
pub type Constraint = fn(&Params) -> Result<(), ApiError>;

pub const ENVIRONMENT_NAME_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9]$";

const ENVIRONMENT_NAME_RULE: &str = "Member must contain only letters, digits, and the dash \
     character and may not start or end with a dash";

#[derive(Debug, Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

/// Operations whose parameters are validated and whose effects are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateApplication,
    UpdateApplication,
    DeleteApplication,
    DescribeApplications,
    CreateApplicationVersion,
    CreateEnvironment,
    DescribeEnvironments,
    UpdateEnvironment,
    TerminateEnvironment,
    SwapEnvironmentCnames,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::CreateApplication,
        Operation::UpdateApplication,
        Operation::DeleteApplication,
        Operation::DescribeApplications,
        Operation::CreateApplicationVersion,
        Operation::CreateEnvironment,
        Operation::DescribeEnvironments,
        Operation::UpdateEnvironment,
        Operation::TerminateEnvironment,
        Operation::SwapEnvironmentCnames,
    ];

    /// Wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateApplication => "createApplication",
            Operation::UpdateApplication => "updateApplication",
            Operation::DeleteApplication => "deleteApplication",
            Operation::DescribeApplications => "describeApplications",
            Operation::CreateApplicationVersion => "createApplicationVersion",
            Operation::CreateEnvironment => "createEnvironment",
            Operation::DescribeEnvironments => "describeEnvironments",
            Operation::UpdateEnvironment => "updateEnvironment",
            Operation::TerminateEnvironment => "terminateEnvironment",
            Operation::SwapEnvironmentCnames => "swapEnvironmentCNAMEs",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Checked against a declared type after the other per-field checks.
    Typed(TypeSpec),
    /// Only pattern and length constraints apply.
    Untyped,
    /// Shape checked by a dedicated validator.
    Nested(NestedCheck),
}

/// A regular expression plus the human-readable rule quoted in errors.
#[derive(Debug)]
pub struct Pattern {
    pub regex: Regex,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub pattern: Option<Pattern>,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            required: false,
            kind,
            min: None,
            max: None,
            pattern: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::Typed(TypeSpec::Scalar(TypeTag::String)))
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Typed(TypeSpec::Scalar(TypeTag::Boolean)))
    }

    pub fn string_list(name: &'static str) -> Self {
        Self::new(
            name,
            FieldKind::Typed(TypeSpec::ArrayOf(Some(TypeTag::String))),
        )
    }

    pub fn untyped(name: &'static str) -> Self {
        Self::new(name, FieldKind::Untyped)
    }

    pub fn nested(name: &'static str, check: NestedCheck) -> Self {
        Self::new(name, FieldKind::Nested(check))
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn pattern(mut self, regex: Regex, description: &'static str) -> Self {
        self.pattern = Some(Pattern { regex, description });
        self
    }
}

#[derive(Debug)]
pub struct Schema {
    pub operation: Operation,
    pub constraint: Option<Constraint>,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

static REGISTRY: LazyLock<Vec<Schema>> =
    LazyLock::new(|| Operation::ALL.into_iter().map(build_schema).collect());

/// Schema for a modeled operation.
pub fn schema(operation: Operation) -> &'static Schema {
    &REGISTRY[operation.index()]
}

fn environment_name_regex() -> Regex {
    Regex::new(ENVIRONMENT_NAME_PATTERN).expect("environment name pattern is valid")
}

fn build_schema(operation: Operation) -> Schema {
    let (constraint, fields): (Option<Constraint>, Vec<FieldSpec>) = match operation {
        Operation::CreateApplication | Operation::UpdateApplication => (
            None,
            vec![
                FieldSpec::string("ApplicationName").required(),
                FieldSpec::string("Description"),
            ],
        ),
        Operation::DeleteApplication => (
            None,
            vec![
                FieldSpec::string("ApplicationName").required(),
                FieldSpec::string("Description"),
                FieldSpec::boolean("TerminateEnvByForce"),
            ],
        ),
        Operation::DescribeApplications => (None, vec![FieldSpec::string_list("ApplicationNames")]),
        Operation::CreateApplicationVersion => (
            None,
            vec![
                FieldSpec::string("ApplicationName").required(),
                FieldSpec::boolean("AutoCreateApplication"),
                FieldSpec::string("Description"),
                FieldSpec::nested("SourceBundle", rules::source_bundle),
                FieldSpec::string("VersionLabel").required().length(1, 100),
            ],
        ),
        Operation::CreateEnvironment => (
            Some(rules::create_environment as Constraint),
            vec![
                FieldSpec::string("ApplicationName").required(),
                FieldSpec::string("CNAMEPrefix").length(4, 63),
                FieldSpec::string("Description").length(0, 200),
                FieldSpec::untyped("EnvironmentName")
                    .required()
                    .length(4, 23)
                    .pattern(environment_name_regex(), ENVIRONMENT_NAME_RULE),
                FieldSpec::nested("OptionSettings", rules::option_list),
                FieldSpec::nested("OptionsToRemove", rules::option_list),
                FieldSpec::nested("SolutionStackName", rules::solution_stack),
                FieldSpec::nested("Tags", rules::tag_list),
                FieldSpec::nested("Tier", rules::tier),
                FieldSpec::string("TemplateName").length(1, 100),
                FieldSpec::string("VersionLabel").length(1, 100),
            ],
        ),
        Operation::DescribeEnvironments => (
            None,
            vec![
                FieldSpec::string("ApplicationName"),
                FieldSpec::string_list("EnvironmentIds"),
                FieldSpec::string_list("EnvironmentNames"),
                FieldSpec::boolean("IncludeDeleted"),
                FieldSpec::string("VersionLabel"),
            ],
        ),
        Operation::UpdateEnvironment => (
            Some(rules::update_environment as Constraint),
            vec![
                FieldSpec::string("Description").length(0, 200),
                FieldSpec::string("EnvironmentId"),
                FieldSpec::string("EnvironmentName"),
                FieldSpec::nested("OptionSettings", rules::option_list),
                FieldSpec::nested("OptionsToRemove", rules::option_list),
                FieldSpec::nested("Tier", rules::tier),
                FieldSpec::string("TemplateName").length(1, 100),
                FieldSpec::string("VersionLabel").length(1, 100),
            ],
        ),
        Operation::TerminateEnvironment => (
            Some(rules::terminate_environment as Constraint),
            vec![
                FieldSpec::string("EnvironmentId"),
                FieldSpec::string("EnvironmentName"),
                FieldSpec::boolean("TerminateResources"),
            ],
        ),
        Operation::SwapEnvironmentCnames => (
            Some(rules::swap_environment_cnames as Constraint),
            vec![
                FieldSpec::string("SourceEnvironmentName"),
                FieldSpec::string("SourceEnvironmentId"),
                FieldSpec::string("DestinationEnvironmentName"),
                FieldSpec::string("DestinationEnvironmentId"),
            ],
        ),
    };

    Schema {
        operation,
        constraint,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_has_its_own_schema() {
        for op in Operation::ALL {
            assert_eq!(schema(op).operation, op);
        }
    }

    #[test]
    fn operation_names_roundtrip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(
            "swapEnvironmentCNAMEs".parse::<Operation>().unwrap(),
            Operation::SwapEnvironmentCnames
        );
        assert!("describeEvents".parse::<Operation>().is_err());
    }

    #[test]
    fn create_environment_requires_application_and_name() {
        let required: Vec<&str> = schema(Operation::CreateEnvironment)
            .required_fields()
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["ApplicationName", "EnvironmentName"]);
    }

    #[test]
    fn environment_name_pattern() {
        let re = environment_name_regex();
        assert!(re.is_match("mye-nv"));
        assert!(re.is_match("MyEnv01"));
        assert!(!re.is_match("-myenv"));
        assert!(!re.is_match("myenv-"));
        assert!(!re.is_match("mye_nv"));
    }

    #[test]
    fn describe_applications_has_no_required_fields() {
        assert_eq!(
            schema(Operation::DescribeApplications)
                .required_fields()
                .count(),
            0
        );
    }
}
