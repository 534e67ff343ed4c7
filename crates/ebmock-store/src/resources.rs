use crate::records::{Application, ApplicationVersion, Environment, EnvironmentStatus};
use crate::StoreError;
use ebmock_schema::{EnvironmentId, VersionLabel};
use tracing::debug;

/// Key used to look up a single environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKey<'a> {
    Id(&'a str),
    Name(&'a str),
}

impl EnvironmentKey<'_> {
    fn matches(self, env: &Environment) -> bool {
        match self {
            EnvironmentKey::Id(id) => env.environment_id == id,
            EnvironmentKey::Name(name) => env.environment_name == name,
        }
    }
}

impl std::fmt::Display for EnvironmentKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentKey::Id(id) => write!(f, "EnvironmentId '{id}'"),
            EnvironmentKey::Name(name) => write!(f, "EnvironmentName '{name}'"),
        }
    }
}

/// Optional filters for listing environments. A record is listed only if it
/// satisfies every filter that is set.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentFilter {
    pub environment_ids: Option<Vec<String>>,
    pub environment_names: Option<Vec<String>>,
    pub application_name: Option<String>,
    pub version_label: Option<String>,
    pub include_terminated: bool,
}

impl EnvironmentFilter {
    /// A filter that lists every environment, terminated ones included.
    pub fn all() -> Self {
        Self {
            include_terminated: true,
            ..Self::default()
        }
    }

    pub fn matches(&self, env: &Environment) -> bool {
        let listed = |list: &Option<Vec<String>>, value: &str| {
            list.as_ref().map_or(true, |l| l.iter().any(|v| v == value))
        };
        let equals = |expected: &Option<String>, actual: Option<&str>| {
            expected.as_deref().map_or(true, |e| actual == Some(e))
        };

        listed(&self.environment_ids, env.environment_id.as_str())
            && listed(&self.environment_names, env.environment_name.as_str())
            && equals(&self.application_name, Some(env.application_name.as_str()))
            && equals(&self.version_label, env.version_label.as_deref())
            && (self.include_terminated || env.status != EnvironmentStatus::Terminated)
    }
}

/// In-memory home of applications, versions, and environments.
///
/// Collections keep insertion order and every lookup is an ordered scan that
/// returns the first exact match. Reads hand out clones, so callers never
/// alias stored state.
#[derive(Debug, Default)]
pub struct ResourceStore {
    applications: Vec<Application>,
    versions: Vec<ApplicationVersion>,
    environments: Vec<Environment>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Applications

    pub fn insert_application(&mut self, app: Application) {
        debug!("storing application '{}'", app.application_name);
        self.applications.push(app);
    }

    pub fn application(&self, name: &str) -> Option<&Application> {
        self.applications
            .iter()
            .find(|a| a.application_name == name)
    }

    pub fn application_mut(&mut self, name: &str) -> Option<&mut Application> {
        self.applications
            .iter_mut()
            .find(|a| a.application_name == name)
    }

    pub fn application_exists(&self, name: &str) -> bool {
        self.application(name).is_some()
    }

    /// Remove the first application with the given name, if any.
    pub fn remove_application(&mut self, name: &str) -> Option<Application> {
        let pos = self
            .applications
            .iter()
            .position(|a| a.application_name == name)?;
        debug!("removing application '{name}'");
        Some(self.applications.remove(pos))
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Applications whose name is in `names` (all when `None`), in store order.
    pub fn list_applications(&self, names: Option<&[String]>) -> Vec<Application> {
        self.applications
            .iter()
            .filter(|a| names.map_or(true, |n| n.iter().any(|name| a.application_name == *name)))
            .cloned()
            .collect()
    }

    // Versions

    /// Store a version and append its label to the owning application.
    pub fn insert_version(&mut self, version: ApplicationVersion) -> Result<(), StoreError> {
        let app = self
            .applications
            .iter_mut()
            .find(|a| a.application_name == version.application_name)
            .ok_or_else(|| {
                StoreError::ApplicationNotFound(version.application_name.to_string())
            })?;
        app.versions.push(version.version_label.clone());
        debug!(
            "storing version '{}' of application '{}'",
            version.version_label, version.application_name
        );
        self.versions.push(version);
        Ok(())
    }

    pub fn version(&self, application: &str, label: &str) -> Option<&ApplicationVersion> {
        self.versions
            .iter()
            .find(|v| v.application_name == application && v.version_label == label)
    }

    pub fn version_exists(&self, application: &str, label: &str) -> bool {
        self.version(application, label).is_some()
    }

    pub fn versions_of(&self, application: &str) -> Vec<VersionLabel> {
        self.versions
            .iter()
            .filter(|v| v.application_name == application)
            .map(|v| v.version_label.clone())
            .collect()
    }

    pub fn versions(&self) -> &[ApplicationVersion] {
        &self.versions
    }

    // Environments

    pub fn insert_environment(&mut self, env: Environment) {
        debug!(
            "storing environment {} ('{}')",
            env.environment_id, env.environment_name
        );
        self.environments.push(env);
    }

    pub fn find_environment(&self, key: EnvironmentKey<'_>) -> Option<&Environment> {
        self.environments.iter().find(|e| key.matches(e))
    }

    /// Resolve the first key that matches an environment, trying keys in order.
    pub fn resolve_environment(&self, keys: &[EnvironmentKey<'_>]) -> Option<EnvironmentId> {
        keys.iter()
            .find_map(|key| self.find_environment(*key))
            .map(|e| e.environment_id.clone())
    }

    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.find_environment(EnvironmentKey::Id(id))
    }

    pub fn environment_mut(&mut self, id: &str) -> Option<&mut Environment> {
        self.environments
            .iter_mut()
            .find(|e| e.environment_id == id)
    }

    pub fn list_environments(&self, filter: &EnvironmentFilter) -> Vec<Environment> {
        self.environments
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Exchange the CNAMEs of two environments. No other field changes.
    pub fn swap_cnames(&mut self, a: &str, b: &str) -> Result<(), StoreError> {
        let pos = |id: &str| {
            self.environments
                .iter()
                .position(|e| e.environment_id == id)
                .ok_or_else(|| StoreError::EnvironmentNotFound(id.to_owned()))
        };
        let (i, j) = (pos(a)?, pos(b)?);
        if i == j {
            return Ok(());
        }
        let cname = std::mem::take(&mut self.environments[i].cname);
        self.environments[i].cname = std::mem::replace(&mut self.environments[j].cname, cname);
        debug!("swapped CNAMEs of {a} and {b}");
        Ok(())
    }
}
