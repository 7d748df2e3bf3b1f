use std::time::Duration;

use garde::Validate;
use serde::Deserialize;

use crate::services::encoder::{FieldNaming, NamingScheme};

/// Prefix for every environment variable the client reads.
const ENV_PREFIX: &str = "EVAL_";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Evaluation service base URL (e.g., "http://localhost:8000")
    #[serde(default = "default_base_url")]
    #[garde(url)]
    pub base_url: String,

    /// Multipart field naming convention: "combined" or "interview"
    #[serde(default)]
    #[garde(skip)]
    pub naming_scheme: NamingScheme,

    /// Overrides the endpoint path implied by the naming scheme
    #[serde(default)]
    #[garde(length(min = 1))]
    pub endpoint_path: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    #[garde(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(garde::Report),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            naming_scheme: NamingScheme::default(),
            endpoint_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load `EVAL_*` variables (after reading `.env` if present) and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::prefixed(ENV_PREFIX).from_env()?;
        config.checked()
    }

    /// Build from explicit key/value pairs, using the same names as the environment.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX).from_iter(pairs)?;
        config.checked()
    }

    pub fn checked(self) -> Result<Self, ConfigError> {
        self.validate().map_err(ConfigError::Invalid)?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Field names and path the encoder should use.
    pub fn field_naming(&self) -> FieldNaming {
        let naming = self.naming_scheme.field_naming();
        match &self.endpoint_path {
            Some(path) => naming.with_path(path.clone()),
            None => naming,
        }
    }
}
