use crate::action::Action;
use crate::engine::Engine;
use crate::responses::Response;
use ebmock_schema::{ApiError, Params};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle that serializes access to one engine across threads.
///
/// Each call holds the lock for the whole operation, so validation and the
/// mutation that follows it are never interleaved with another request.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        // Operations write only after validating; a poisoned engine is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn execute(&self, action: Action, params: &Params) -> Result<Response, ApiError> {
        self.lock().execute(action, params)
    }

    pub fn run_pending(&self) -> usize {
        self.lock().run_pending()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use ebmock_schema::Operation;
    use serde_json::json;
    use std::thread;

    #[test]
    fn concurrent_creates_of_one_name_admit_exactly_one() {
        let shared = SharedEngine::new(Engine::new(EngineConfig::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let params = json!({ "ApplicationName": "race" })
                        .as_object()
                        .cloned()
                        .unwrap();
                    shared
                        .execute(Action::Modeled(Operation::CreateApplication), &params)
                        .is_ok()
                })
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(shared.with(|e| e.store().applications().len()), 1);
    }

    #[test]
    fn distinct_names_all_succeed() {
        let shared = SharedEngine::new(Engine::new(EngineConfig::default()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let params = json!({ "ApplicationName": format!("app{i}") })
                        .as_object()
                        .cloned()
                        .unwrap();
                    shared
                        .execute(Action::Modeled(Operation::CreateApplication), &params)
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.with(|e| e.store().applications().len()), 8);
    }
}
