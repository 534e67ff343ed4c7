//! Request schemas and validation for ebmock.
//!
//! This crate defines the validation layer: the fixed error vocabulary
//! (`ErrorCode`, `ApiError`), the modeled `Operation`s with their static
//! parameter `Schema`s, the `validate` / `validate_with` entry points, the
//! solution-stack catalog, and the typed identifiers and nested shapes shared
//! by the store and the engine.

pub mod error;
pub mod rules;
pub mod schema;
pub mod shapes;
pub mod stacks;
pub mod typecheck;
pub mod types;
pub mod validate;

pub use error::{ApiError, ErrorCode};
pub use schema::{schema, FieldKind, FieldSpec, Operation, Params, Schema, UnknownOperation};
pub use shapes::{OptionSetting, OptionSpecification, SourceBundle, Tag, Tier};
pub use stacks::{is_known_solution_stack, list_solution_stacks, SOLUTION_STACKS};
pub use typecheck::{check_type, is_truthy, tag_of, TypeSpec, TypeTag};
pub use types::{ApplicationName, EnvironmentId, EnvironmentName, RequestId, VersionLabel};
pub use validate::{validate, validate_with};
