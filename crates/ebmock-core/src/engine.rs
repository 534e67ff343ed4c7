use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::ids::{derive_cname, derive_endpoint_url, generate_environment_id};
use crate::lifecycle::{health_for, validate_transition};
use crate::requests::{
    decode, ApplicationInput, CreateApplicationVersionInput, CreateBucketInput,
    CreateEnvironmentInput, DeleteApplicationInput, DescribeApplicationsInput,
    DescribeEnvironmentsInput, PutObjectInput, SwapEnvironmentCnamesInput,
    TerminateEnvironmentInput, UpdateEnvironmentInput,
};
use crate::responses::{
    ApplicationDescriptionMessage, ApplicationDescriptionsMessage,
    ApplicationVersionDescriptionMessage, Empty, EnvironmentDescriptionsMessage,
};
use crate::scheduler::{ScheduledTransition, Scheduler, TransitionKind};
use chrono::{DateTime, Utc};
use ebmock_schema::{validate_with, ApiError, EnvironmentId, Operation, Params};
use ebmock_store::{
    Application, ApplicationVersion, BucketStore, Environment, EnvironmentFilter,
    EnvironmentHealth, EnvironmentKey, EnvironmentStatus, ResourceStore, StoreError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// In-memory lifecycle simulator for applications, versions, and environments.
///
/// Every operation validates its parameters and checks existence before it
/// writes anything, so a rejected request leaves the store untouched.
/// Launch and terminate completions are scheduled on the engine's clock and
/// applied lazily: before every operation and on [`Engine::run_pending`].
pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    store: ResourceStore,
    buckets: BucketStore,
    scheduler: Scheduler,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn admit<F>(operation: Operation, params: &Params, domain_check: F) -> Result<(), ApiError>
where
    F: FnOnce() -> Result<(), ApiError>,
{
    validate_with(operation, params, domain_check)
        .inspect_err(|e| debug!("{operation} rejected: {e}"))
}

/// String parameter that has already passed structural validation.
fn text<'a>(params: &'a Params, key: &str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::ApplicationNotFound(name) => {
            ApiError::invalid_value(format!("No Application named '{name}' found."))
        }
        StoreError::EnvironmentNotFound(id) => {
            ApiError::invalid_value(format!("No environment with EnvironmentId '{id}' found."))
        }
        StoreError::BucketNotFound(bucket) => {
            ApiError::invalid_value(format!("No bucket '{bucket}' currently exists."))
        }
        StoreError::ObjectNotFound { bucket, key } => {
            ApiError::invalid_value(format!("No object '{key}' in bucket '{bucket}'."))
        }
    }
}

fn environment_not_found(keys: &[EnvironmentKey<'_>]) -> ApiError {
    match keys.first() {
        Some(EnvironmentKey::Id(id)) => {
            ApiError::invalid_value(format!("No environment with EnvironmentId '{id}' found."))
        }
        Some(EnvironmentKey::Name(name)) => ApiError::invalid_value(format!(
            "No environment with EnvironmentName '{name}' found."
        )),
        None => ApiError::invalid_value("No matching environment"),
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            clock,
            rng,
            store: ResourceStore::new(),
            buckets: BucketStore::new(),
            scheduler: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn buckets(&self) -> &BucketStore {
        &self.buckets
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Apply every scheduled transition that is due. Returns how many fired.
    pub fn run_pending(&mut self) -> usize {
        let due = self.scheduler.take_due(self.clock.now());
        for transition in &due {
            self.fire(transition);
        }
        due.len()
    }

    fn fire(&mut self, transition: &ScheduledTransition) {
        let Some(env) = self.store.environment_mut(&transition.environment_id) else {
            warn!(
                "{:?} due for {}, but the environment is gone",
                transition.kind, transition.environment_id
            );
            return;
        };
        let target = transition.kind.target();
        match validate_transition(env.status, target) {
            Ok(()) => {
                env.status = target;
                env.health = health_for(target);
                debug!("environment {} is now {target}", env.environment_id);
            }
            Err(e) => debug!(
                "skipping {:?} for {}: {e}",
                transition.kind, transition.environment_id
            ),
        }
    }

    /// Apply due transitions, then run `op`. Errors carry the engine clock's time.
    fn operate<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        self.run_pending();
        let now = self.clock.now();
        op(self).map_err(|e| e.with_time(now))
    }

    fn schedule(&mut self, environment_id: EnvironmentId, kind: TransitionKind) {
        let delay = match kind {
            TransitionKind::LaunchComplete => self.config.launch_delay(),
            TransitionKind::TerminateComplete => self.config.terminate_delay(),
        };
        let due_at = self.clock.now() + delay;
        let task = self.scheduler.schedule(environment_id.clone(), kind, due_at);
        debug!("scheduled {kind:?} for {environment_id} at {due_at} ({task})");
    }

    // Applications

    pub fn create_application(
        &mut self,
        params: &Params,
    ) -> Result<ApplicationDescriptionMessage, ApiError> {
        self.operate(|engine| {
            let store = &engine.store;
            admit(Operation::CreateApplication, params, || {
                let name = text(params, "ApplicationName");
                if store.application_exists(name) {
                    return Err(ApiError::invalid_value(format!(
                        "Application {name} already exists."
                    )));
                }
                Ok(())
            })?;
            let input: ApplicationInput = decode(Operation::CreateApplication, params)?;

            let app = Application::new(
                input.application_name,
                input.description,
                engine.clock.now(),
            );
            info!("created application '{}'", app.application_name);
            engine.store.insert_application(app.clone());
            Ok(ApplicationDescriptionMessage { application: app })
        })
    }

    /// Overwrite an application's description. The description is cleared
    /// when the request omits it.
    pub fn update_application(
        &mut self,
        params: &Params,
    ) -> Result<ApplicationDescriptionMessage, ApiError> {
        self.operate(|engine| {
            let store = &engine.store;
            admit(Operation::UpdateApplication, params, || {
                let name = text(params, "ApplicationName");
                if !store.application_exists(name) {
                    return Err(ApiError::invalid_value(format!(
                        "No Application named '{name}' found."
                    )));
                }
                Ok(())
            })?;
            let input: ApplicationInput = decode(Operation::UpdateApplication, params)?;

            let now = engine.clock.now();
            let app = engine
                .store
                .application_mut(&input.application_name)
                .ok_or_else(|| {
                    store_error(StoreError::ApplicationNotFound(
                        input.application_name.to_string(),
                    ))
                })?;
            app.description = input.description;
            app.date_updated = now;
            info!("updated application '{}'", app.application_name);
            Ok(ApplicationDescriptionMessage {
                application: app.clone(),
            })
        })
    }

    /// Remove an application. Deleting an unknown application succeeds.
    ///
    /// With `TerminateEnvByForce`, the application's live environments start
    /// terminating first. Environments are never removed with their application.
    pub fn delete_application(&mut self, params: &Params) -> Result<Empty, ApiError> {
        self.operate(|engine| {
            admit(Operation::DeleteApplication, params, || Ok(()))?;
            let input: DeleteApplicationInput = decode(Operation::DeleteApplication, params)?;

            if input.terminate_env_by_force == Some(true) {
                let live: Vec<EnvironmentId> = engine
                    .store
                    .environments()
                    .iter()
                    .filter(|e| e.application_name == input.application_name && e.status.is_live())
                    .map(|e| e.environment_id.clone())
                    .collect();
                for id in live {
                    engine.begin_termination(&id)?;
                }
            }

            if engine.store.remove_application(&input.application_name).is_some() {
                info!("deleted application '{}'", input.application_name);
            } else {
                debug!(
                    "application '{}' does not exist; nothing to delete",
                    input.application_name
                );
            }
            Ok(Empty {})
        })
    }

    pub fn describe_applications(
        &mut self,
        params: &Params,
    ) -> Result<ApplicationDescriptionsMessage, ApiError> {
        self.operate(|engine| {
            admit(Operation::DescribeApplications, params, || Ok(()))?;
            let input: DescribeApplicationsInput = decode(Operation::DescribeApplications, params)?;
            Ok(ApplicationDescriptionsMessage {
                applications: engine
                    .store
                    .list_applications(input.application_names.as_deref()),
            })
        })
    }

    // Versions

    pub fn create_application_version(
        &mut self,
        params: &Params,
    ) -> Result<ApplicationVersionDescriptionMessage, ApiError> {
        self.operate(|engine| {
            let store = &engine.store;
            admit(Operation::CreateApplicationVersion, params, || {
                let app = text(params, "ApplicationName");
                let label = text(params, "VersionLabel");
                let auto_create = params
                    .get("AutoCreateApplication")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                if !auto_create && !store.application_exists(app) {
                    return Err(ApiError::invalid_value(format!(
                        "No Application named '{app}' found."
                    )));
                }
                if store.version_exists(app, label) {
                    return Err(ApiError::invalid_value(format!(
                        "Application Version {label} already exists."
                    )));
                }
                Ok(())
            })?;
            let input: CreateApplicationVersionInput =
                decode(Operation::CreateApplicationVersion, params)?;

            let now = engine.clock.now();
            if !engine.store.application_exists(&input.application_name) {
                info!("auto-creating application '{}'", input.application_name);
                engine.store.insert_application(Application::new(
                    input.application_name.clone(),
                    None,
                    now,
                ));
            }

            let version = ApplicationVersion {
                application_name: input.application_name,
                version_label: input.version_label,
                description: input.description,
                source_bundle: input.source_bundle.unwrap_or_default(),
                date_created: now,
                date_updated: now,
            };
            engine
                .store
                .insert_version(version.clone())
                .map_err(store_error)?;
            info!(
                "created version '{}' of application '{}'",
                version.version_label, version.application_name
            );
            Ok(ApplicationVersionDescriptionMessage {
                application_version: version,
            })
        })
    }

    // Environments

    /// Create an environment in `Launching`/`Grey`. It reports
    /// `Launched`/`Green` once the launch delay has passed.
    pub fn create_environment(&mut self, params: &Params) -> Result<Environment, ApiError> {
        self.operate(|engine| {
            let store = &engine.store;
            admit(Operation::CreateEnvironment, params, || {
                let app = text(params, "ApplicationName");
                if !store.application_exists(app) {
                    return Err(ApiError::invalid_value(format!(
                        "No Application {app} found."
                    )));
                }
                if let Some(label) = params.get("VersionLabel").and_then(Value::as_str) {
                    if !store.version_exists(app, label) {
                        return Err(ApiError::invalid_value(format!(
                            "No VersionLabel for {label} with Application {app}."
                        )));
                    }
                }
                Ok(())
            })?;
            let input: CreateEnvironmentInput = decode(Operation::CreateEnvironment, params)?;

            let now = engine.clock.now();
            let environment_id = generate_environment_id(&mut engine.rng);
            let cname = derive_cname(
                &mut engine.rng,
                &input.environment_name,
                input.cname_prefix.as_deref(),
                &engine.config.cname_domain,
            );
            let endpoint_url = derive_endpoint_url(
                &mut engine.rng,
                &environment_id,
                &engine.config.endpoint_domain,
            );

            let env = Environment {
                environment_id: environment_id.clone(),
                environment_name: input.environment_name,
                application_name: input.application_name,
                version_label: input.version_label,
                description: input.description,
                status: EnvironmentStatus::Launching,
                health: EnvironmentHealth::Grey,
                tier: input.tier.unwrap_or_default(),
                cname,
                endpoint_url,
                date_created: now,
                date_updated: now,
                template_name: input.template_name,
                solution_stack_name: input.solution_stack_name,
                option_settings: input.option_settings,
                options_to_remove: input.options_to_remove,
                tags: input.tags,
            };
            info!(
                "created environment {} ('{}') for application '{}'",
                env.environment_id, env.environment_name, env.application_name
            );
            engine.store.insert_environment(env.clone());
            engine.schedule(environment_id, TransitionKind::LaunchComplete);
            Ok(env)
        })
    }

    /// List environments matching every given filter. Terminated environments
    /// are included unless `IncludeDeleted` is false.
    pub fn describe_environments(
        &mut self,
        params: &Params,
    ) -> Result<EnvironmentDescriptionsMessage, ApiError> {
        self.operate(|engine| {
            admit(Operation::DescribeEnvironments, params, || Ok(()))?;
            let input: DescribeEnvironmentsInput = decode(Operation::DescribeEnvironments, params)?;
            let filter = EnvironmentFilter {
                environment_ids: input.environment_ids,
                environment_names: input.environment_names,
                application_name: input.application_name,
                version_label: input.version_label,
                include_terminated: input.include_deleted.unwrap_or(true),
            };
            Ok(EnvironmentDescriptionsMessage {
                environments: engine.store.list_environments(&filter),
            })
        })
    }

    /// Shallow-merge the given fields into an environment found by id, then
    /// by name. The environment id itself is never rewritten.
    pub fn update_environment(&mut self, params: &Params) -> Result<Environment, ApiError> {
        self.operate(|engine| {
            let store = &engine.store;
            admit(Operation::UpdateEnvironment, params, || {
                let requested: UpdateEnvironmentInput =
                    decode(Operation::UpdateEnvironment, params)?;
                let keys = requested.keys();
                let id = store
                    .resolve_environment(&keys)
                    .ok_or_else(|| environment_not_found(&keys))?;
                if let (Some(label), Some(env)) =
                    (&requested.version_label, store.environment(&id))
                {
                    if !store.version_exists(&env.application_name, label) {
                        return Err(ApiError::invalid_value(format!(
                            "No VersionLabel for {label} with Application {}.",
                            env.application_name
                        )));
                    }
                }
                Ok(())
            })?;
            let input: UpdateEnvironmentInput = decode(Operation::UpdateEnvironment, params)?;

            let keys = input.keys();
            let id = engine
                .store
                .resolve_environment(&keys)
                .ok_or_else(|| environment_not_found(&keys))?;
            let now = engine.clock.now();
            let env = engine
                .store
                .environment_mut(&id)
                .ok_or_else(|| store_error(StoreError::EnvironmentNotFound(id.to_string())))?;

            if let Some(name) = input.environment_name.filter(|n| !n.is_empty()) {
                env.environment_name = name.into();
            }
            if let Some(description) = input.description {
                env.description = Some(description);
            }
            if let Some(settings) = input.option_settings {
                env.option_settings = Some(settings);
            }
            if let Some(removals) = input.options_to_remove {
                env.options_to_remove = Some(removals);
            }
            if let Some(tier) = input.tier {
                env.tier = tier;
            }
            if let Some(template) = input.template_name {
                env.template_name = Some(template);
            }
            if let Some(label) = input.version_label {
                env.version_label = Some(label);
            }
            env.date_updated = now;

            info!("updated environment {}", env.environment_id);
            Ok(env.clone())
        })
    }

    /// Start terminating an environment found by id, then by name. It
    /// reports `Terminated` once the terminate delay has passed.
    pub fn terminate_environment(&mut self, params: &Params) -> Result<Environment, ApiError> {
        self.operate(|engine| {
            admit(Operation::TerminateEnvironment, params, || Ok(()))?;
            let input: TerminateEnvironmentInput = decode(Operation::TerminateEnvironment, params)?;

            let keys = input.keys();
            let id = engine.store.resolve_environment(&keys).ok_or_else(|| {
                debug!("terminateEnvironment rejected: no environment for {keys:?}");
                ApiError::invalid_value("No matching environment")
            })?;
            engine.begin_termination(&id)
        })
    }

    fn begin_termination(&mut self, id: &EnvironmentId) -> Result<Environment, ApiError> {
        let now = self.clock.now();
        let env = self
            .store
            .environment_mut(id)
            .ok_or_else(|| store_error(StoreError::EnvironmentNotFound(id.to_string())))?;
        validate_transition(env.status, EnvironmentStatus::Terminating).map_err(|_| {
            ApiError::invalid_value(format!(
                "Environment named {} is in an invalid state for this operation. \
                 Must be Launching or Launched.",
                env.environment_name
            ))
        })?;
        env.status = EnvironmentStatus::Terminating;
        env.health = health_for(EnvironmentStatus::Terminating);
        env.date_updated = now;
        let snapshot = env.clone();

        info!("terminating environment {id}");
        self.schedule(id.clone(), TransitionKind::TerminateComplete);
        Ok(snapshot)
    }

    /// Exchange the CNAMEs of two environments, each found by name, then by id.
    pub fn swap_environment_cnames(&mut self, params: &Params) -> Result<Empty, ApiError> {
        self.operate(|engine| {
            admit(Operation::SwapEnvironmentCnames, params, || Ok(()))?;
            let input: SwapEnvironmentCnamesInput =
                decode(Operation::SwapEnvironmentCnames, params)?;

            let source = engine.store.resolve_environment(&input.source_keys());
            let destination = engine.store.resolve_environment(&input.destination_keys());
            let (Some(source), Some(destination)) = (source, destination) else {
                return Err(ApiError::invalid_value(
                    "Both Source environment and Destination environment must exist.",
                ));
            };
            engine
                .store
                .swap_cnames(&source, &destination)
                .map_err(store_error)?;
            info!("swapped CNAMEs of {source} and {destination}");
            Ok(Empty {})
        })
    }

    // Buckets

    pub fn create_bucket(&mut self, params: &Params) -> Result<Empty, ApiError> {
        self.operate(|engine| {
            let input: CreateBucketInput = decode_bucket_params(params)?;
            engine.buckets.create_bucket(&input.bucket);
            info!("created bucket '{}'", input.bucket);
            Ok(Empty {})
        })
    }

    pub fn put_object(&mut self, params: &Params) -> Result<Empty, ApiError> {
        self.operate(|engine| {
            let input: PutObjectInput = decode_bucket_params(params)?;
            let body = input.body_bytes();
            let size = body.len();
            engine
                .buckets
                .put_object(&input.bucket, &input.key, body)
                .map_err(store_error)?;
            info!("stored {size} bytes at {}/{}", input.bucket, input.key);
            Ok(Empty {})
        })
    }
}

fn decode_bucket_params<T: serde::de::DeserializeOwned>(params: &Params) -> Result<T, ApiError> {
    for key in ["Bucket", "Key"] {
        if params.get(key).is_some_and(|v| !v.is_string()) {
            return Err(ApiError::invalid_type(format!(
                "Expected params.{key} to be a string"
            )));
        }
    }
    serde_json::from_value(Value::Object(params.clone())).map_err(|e| {
        ApiError::missing_required(format!("Missing required key in params: {e}"))
    })
}
