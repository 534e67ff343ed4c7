//! Asynchronous delivery of results.
//!
//! Callers never see a result during the call that produced it. A
//! [`Service`] runs the action right away, wraps the outcome in a
//! [`Delivery`], and hands it to a [`Dispatcher`]; the
//! [`DeferredDispatcher`] holds deliveries until the caller flushes it.

use crate::action::Action;
use crate::engine::Engine;
use crate::ids::generate_request_id;
use crate::responses::Response;
use ebmock_schema::{ApiError, Params, RequestId};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseMetadata {
    pub request_id: RequestId,
}

/// Successful result body plus its response metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    #[serde(flatten)]
    pub body: Response,
    #[serde(rename = "ResponseMetadata")]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub request_id: RequestId,
    pub action: Action,
    pub outcome: Result<Envelope, ApiError>,
}

impl Delivery {
    /// `{"error": ..., "data": ...}` with exactly one of the two non-null.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        Ok(match &self.outcome {
            Ok(envelope) => json!({
                "error": Value::Null,
                "data": serde_json::to_value(envelope)?,
            }),
            Err(error) => json!({
                "error": serde_json::to_value(error)?,
                "data": Value::Null,
            }),
        })
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub trait Dispatcher {
    fn dispatch(&mut self, delivery: Delivery);
}

/// Queues deliveries until [`DeferredDispatcher::flush`] is called.
#[derive(Debug, Default)]
pub struct DeferredDispatcher {
    queue: VecDeque<Delivery>,
}

impl DeferredDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn flush(&mut self) -> Vec<Delivery> {
        self.queue.drain(..).collect()
    }
}

impl Dispatcher for DeferredDispatcher {
    fn dispatch(&mut self, delivery: Delivery) {
        self.queue.push_back(delivery);
    }
}

/// Hands each delivery straight to a callback.
pub struct CallbackDispatcher<F: FnMut(Delivery)> {
    callback: F,
}

impl<F: FnMut(Delivery)> CallbackDispatcher<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(Delivery)> Dispatcher for CallbackDispatcher<F> {
    fn dispatch(&mut self, delivery: Delivery) {
        (self.callback)(delivery);
    }
}

/// An engine whose results go out through a dispatcher.
pub struct Service<D: Dispatcher> {
    engine: Engine,
    dispatcher: D,
}

impl<D: Dispatcher> Service<D> {
    pub fn new(engine: Engine, dispatcher: D) -> Self {
        Self { engine, dispatcher }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// Run `action` now and dispatch its outcome. Returns the request id the
    /// delivery will carry.
    pub fn submit(&mut self, action: Action, params: &Params) -> RequestId {
        let request_id = generate_request_id();
        let outcome = self.engine.execute(action, params).map(|body| Envelope {
            body,
            response_metadata: ResponseMetadata {
                request_id: request_id.clone(),
            },
        });
        debug!(
            "{action} {request_id}: {}",
            if outcome.is_ok() { "ok" } else { "error" }
        );
        self.dispatcher.dispatch(Delivery {
            request_id: request_id.clone(),
            action,
            outcome,
        });
        request_id
    }

    pub fn into_parts(self) -> (Engine, D) {
        (self.engine, self.dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use ebmock_schema::{ErrorCode, Operation};

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    fn service() -> Service<DeferredDispatcher> {
        Service::new(
            Engine::new(EngineConfig::default()),
            DeferredDispatcher::new(),
        )
    }

    #[test]
    fn nothing_is_delivered_before_flush() {
        let mut service = service();
        service.submit(
            Action::Modeled(Operation::CreateApplication),
            &params(json!({ "ApplicationName": "yeah" })),
        );
        assert_eq!(service.dispatcher().pending(), 1);
        // The effect is already applied even though the result is queued.
        assert!(service.engine().store().application_exists("yeah"));
        let deliveries = service.dispatcher_mut().flush();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(service.dispatcher().pending(), 0);
    }

    #[test]
    fn success_carries_request_id_in_metadata() {
        let mut service = service();
        let request_id = service.submit(
            Action::Modeled(Operation::CreateApplication),
            &params(json!({ "ApplicationName": "yeah" })),
        );
        let delivery = service.dispatcher_mut().flush().remove(0);
        assert_eq!(delivery.request_id, request_id);
        let json = delivery.to_json().unwrap();
        assert!(json["error"].is_null());
        assert_eq!(json["data"]["Application"]["ApplicationName"], "yeah");
        assert_eq!(
            json["data"]["ResponseMetadata"]["RequestId"],
            request_id.as_str()
        );
    }

    #[test]
    fn failure_has_error_and_no_data() {
        let mut service = service();
        service.submit(
            Action::Modeled(Operation::CreateApplication),
            &params(json!({})),
        );
        let delivery = service.dispatcher_mut().flush().remove(0);
        let err = delivery.outcome.as_ref().unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingRequiredParameter);
        let json = delivery.to_json().unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "MissingRequiredParameter");
    }

    #[test]
    fn delivery_json_has_exactly_one_side() {
        let request_id = generate_request_id();
        let ok = Delivery {
            request_id: request_id.clone(),
            action: Action::Unsupported("describeEvents"),
            outcome: Ok(Envelope {
                body: Response::from(crate::responses::Empty {}),
                response_metadata: ResponseMetadata {
                    request_id: request_id.clone(),
                },
            }),
        };
        let failed = Delivery {
            request_id,
            action: Action::CreateBucket,
            outcome: Err(ApiError::invalid_value("No bucket 'b' currently exists.")),
        };
        for delivery in [ok, failed] {
            let json = delivery.to_json().unwrap();
            let object = json.as_object().unwrap();
            assert_eq!(object.len(), 2);
            assert_ne!(json["error"].is_null(), json["data"].is_null());
            assert_eq!(json["data"].is_null(), !delivery.is_ok());
        }
    }

    #[test]
    fn request_ids_differ_per_submission() {
        let mut service = service();
        let a = service.submit(Action::Unsupported("describeEvents"), &Params::new());
        let b = service.submit(Action::Unsupported("describeEvents"), &Params::new());
        assert_ne!(a, b);
    }

    #[test]
    fn callback_dispatcher_forwards_immediately() {
        let mut seen = Vec::new();
        {
            let mut service = Service::new(
                Engine::new(EngineConfig::default()),
                CallbackDispatcher::new(|d: Delivery| seen.push(d.is_ok())),
            );
            service.submit(Action::Unsupported("restartAppServer"), &Params::new());
        }
        assert_eq!(seen, vec![true]);
    }
}
