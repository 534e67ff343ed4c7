use crate::CoreError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LAUNCH_DELAY_MS: u32 = 50;
pub const DEFAULT_TERMINATE_DELAY_MS: u32 = 50;
pub const DEFAULT_CNAME_DOMAIN: &str = "elasticbeanstalk.com";
pub const DEFAULT_ENDPOINT_DOMAIN: &str = "elb.amazonaws.com";

/// Tunables of the lifecycle engine.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// launch_delay_ms = 10
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Delay before a launching environment reports `Launched`.
    pub launch_delay_ms: u32,
    /// Delay before a terminating environment reports `Terminated`.
    pub terminate_delay_ms: u32,
    pub cname_domain: String,
    pub endpoint_domain: String,
    /// Seed for generated identifiers. Unset means fresh entropy per engine.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            launch_delay_ms: DEFAULT_LAUNCH_DELAY_MS,
            terminate_delay_ms: DEFAULT_TERMINATE_DELAY_MS,
            cname_domain: DEFAULT_CNAME_DOMAIN.to_owned(),
            endpoint_domain: DEFAULT_ENDPOINT_DOMAIN.to_owned(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for (key, domain) in [
            ("cname_domain", &self.cname_domain),
            ("endpoint_domain", &self.endpoint_domain),
        ] {
            if domain.is_empty() || domain.starts_with('.') || domain.contains(char::is_whitespace)
            {
                return Err(CoreError::Config(format!(
                    "{key} must be a bare domain name, got '{domain}'"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_launch_delay(mut self, ms: u32) -> Self {
        self.launch_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn with_terminate_delay(mut self, ms: u32) -> Self {
        self.terminate_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn with_cname_domain(mut self, domain: impl Into<String>) -> Self {
        self.cname_domain = domain.into();
        self
    }

    #[must_use]
    pub fn with_endpoint_domain(mut self, domain: impl Into<String>) -> Self {
        self.endpoint_domain = domain.into();
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn launch_delay(&self) -> Duration {
        Duration::milliseconds(i64::from(self.launch_delay_ms))
    }

    pub fn terminate_delay(&self) -> Duration {
        Duration::milliseconds(i64::from(self.terminate_delay_ms))
    }
}
