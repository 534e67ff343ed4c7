//! Lifecycle engine for ebmock.
//!
//! This crate ties the schema validator and the resource store together into
//! the `Engine`: the behavioral model of the application-platform control
//! API. It covers application, version, and environment operations, delayed
//! status transitions on an injectable clock, identifier and CNAME
//! derivation, name-based action routing, deferred result delivery, and
//! replay of request scripts.

pub mod action;
pub mod clock;
pub mod concurrency;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod ids;
pub mod lifecycle;
pub mod requests;
pub mod responses;
pub mod scheduler;
pub mod script;

pub use action::{Action, UNSUPPORTED_OPERATIONS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use concurrency::SharedEngine;
pub use config::EngineConfig;
pub use dispatch::{
    CallbackDispatcher, DeferredDispatcher, Delivery, Dispatcher, Envelope, ResponseMetadata,
    Service,
};
pub use engine::Engine;
pub use lifecycle::validate_transition;
pub use responses::{
    ApplicationDescriptionMessage, ApplicationDescriptionsMessage,
    ApplicationVersionDescriptionMessage, Empty, EnvironmentDescriptionsMessage, Response,
};
pub use scheduler::{ScheduledTransition, Scheduler, TaskId, TransitionKind};
pub use script::{Script, Step};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
