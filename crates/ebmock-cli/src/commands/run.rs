use super::{json_line, EXIT_FAILURE, EXIT_SUCCESS};
use ebmock_core::{DeferredDispatcher, Engine, EngineConfig, ManualClock, Script, Service};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub fn run(script_path: &Path, config_path: Option<&Path>, strict: bool) -> Result<u8, String> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };
    let script = Script::load(script_path)
        .map_err(|e| format!("script error: {}: {e}", script_path.display()))?;

    let clock = ManualClock::starting_now();
    let engine = Engine::with_clock(config, Arc::new(clock.clone()));
    let mut service = Service::new(engine, DeferredDispatcher::new());
    let deliveries = script
        .run(&mut service, &clock)
        .map_err(|e| format!("script error: {e}"))?;

    let mut failed = 0usize;
    for delivery in &deliveries {
        if !delivery.is_ok() {
            failed += 1;
        }
        let line = delivery
            .to_json()
            .map_err(|e| format!("failed to render response: {e}"))?;
        println!("{}", json_line(&line)?);
    }
    info!(
        "replayed {} step(s), {} response(s), {failed} error(s)",
        script.steps.len(),
        deliveries.len()
    );

    if strict && failed > 0 {
        Ok(EXIT_FAILURE)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
