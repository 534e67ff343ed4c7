//! Request scripts: a JSON list of requests and clock advances replayed
//! against a service on a manual clock.
//!
//! ```json
//! [
//!   { "operation": "createApplication", "params": { "ApplicationName": "app" } },
//!   { "advance_ms": 60 }
//! ]
//! ```

use crate::action::Action;
use crate::clock::ManualClock;
use crate::dispatch::{DeferredDispatcher, Delivery, Service};
use crate::CoreError;
use ebmock_schema::Params;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Request {
        operation: String,
        #[serde(default)]
        params: Params,
    },
    Advance {
        advance_ms: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Resolve every operation name up front so a typo fails before any
    /// request runs.
    pub fn actions(&self) -> Result<Vec<Option<Action>>, CoreError> {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Request { operation, .. } => operation.parse().map(Some),
                Step::Advance { .. } => Ok(None),
            })
            .collect()
    }

    /// Replay the script. Deliveries are flushed after each step and returned
    /// in order.
    pub fn run(
        &self,
        service: &mut Service<DeferredDispatcher>,
        clock: &ManualClock,
    ) -> Result<Vec<Delivery>, CoreError> {
        let actions = self.actions()?;
        let mut deliveries = Vec::new();
        for (step, action) in self.steps.iter().zip(actions) {
            match (step, action) {
                (Step::Request { params, .. }, Some(action)) => {
                    service.submit(action, params);
                }
                (Step::Advance { advance_ms }, _) => {
                    clock.advance_ms(*advance_ms);
                    let fired = service.engine_mut().run_pending();
                    debug!("advanced clock by {advance_ms}ms, {fired} transition(s) fired");
                }
                (Step::Request { .. }, None) => {}
            }
            deliveries.extend(service.dispatcher_mut().flush());
        }
        Ok(deliveries)
    }
}
