//! Configuration of the login helper
//!
//! Supplied once before first use. Browser hosts build it in code; native
//! hosts can also load it from a file and `SC_LOGIN_*` environment variables.

use crate::environment::{Environment, EnvironmentName, EnvironmentOverrides};
use crate::storage::{DEFAULT_COOKIE_TTL_DAYS, DEFAULT_STORAGE_PREFIX};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`AuthConfig::from_env`]
#[cfg(not(target_arch = "wasm32"))]
pub const ENV_PREFIX: &str = "SC_LOGIN";

/// Login helper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Deployment name; unknown names resolve to LOCAL
    pub environment: String,

    /// Port of the central app (local development only)
    pub port: Option<u16>,

    /// Token service base URL (local development only)
    pub token_service: Option<String>,

    /// Cookie domain (local development only)
    pub domain: Option<String>,

    /// The host shares an origin with the central app
    pub internal_communication: bool,

    /// Lifetime of the token and brand cookies
    pub cookie_ttl_days: u32,

    /// Namespace of the durable storage keys
    pub storage_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentName::Local.as_str().to_string(),
            port: None,
            token_service: None,
            domain: None,
            internal_communication: false,
            cookie_ttl_days: DEFAULT_COOKIE_TTL_DAYS,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        }
    }
}

impl AuthConfig {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_token_service(mut self, url: impl Into<String>) -> Self {
        self.token_service = Some(url.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_internal_communication(mut self, enabled: bool) -> Self {
        self.internal_communication = enabled;
        self
    }

    pub fn with_cookie_ttl_days(mut self, days: u32) -> Self {
        self.cookie_ttl_days = days;
        self
    }

    pub fn overrides(&self) -> EnvironmentOverrides {
        EnvironmentOverrides {
            port: self.port,
            token_service: self.token_service.clone(),
            domain: self.domain.clone(),
        }
    }

    /// Resolve the configured deployment
    pub fn environment(&self) -> Environment {
        Environment::resolve(&self.environment, &self.overrides())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AuthConfig {
    /// Load configuration from a file, with `SC_LOGIN_*` variables on top
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::error::CoreResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from defaults and `SC_LOGIN_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed
    pub fn from_env() -> crate::error::CoreResult<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("environment", defaults.environment)?
            .set_default("internal_communication", defaults.internal_communication)?
            .set_default("cookie_ttl_days", i64::from(defaults.cookie_ttl_days))?
            .set_default("storage_prefix", defaults.storage_prefix)?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
