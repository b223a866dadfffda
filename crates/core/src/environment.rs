//! Deployment environments of the Solution Center
//!
//! Every app embedding the login helper runs against one of a fixed set of
//! deployments. An [`Environment`] carries everything the other components
//! need from it: where the central app lives, which domain cookies are
//! scoped to, and where the token service answers.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Path of the login page inside the Solution Center app
pub const LOGIN_PATH: &str = "/login";

/// Path of the logout page inside the Solution Center app
pub const LOGOUT_PATH: &str = "/logout";

/// Port the central app listens on in local development
pub const DEFAULT_LOCAL_PORT: u16 = 3333;

/// Token service used by local development unless overridden
pub const DEFAULT_LOCAL_TOKEN_SERVICE: &str = "https://tm-dev-ext.norris.zalan.do";

/// Token service expected by the testing setup (a mock next to the app)
pub const DEFAULT_TESTING_TOKEN_SERVICE: &str = "http://localhost:3334";

const TOKENS_RESOURCE: &str = "/tokens";

/// Known deployment identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvironmentName {
    Production,
    #[serde(alias = "STAGING")]
    Stage,
    Integration,
    Development,
    #[default]
    Local,
    Testing,
}

impl EnvironmentName {
    /// Resolve a configured name, falling back to `LOCAL` for anything unknown
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "PRODUCTION" => Self::Production,
            "STAGE" | "STAGING" => Self::Stage,
            "INTEGRATION" => Self::Integration,
            "DEVELOPMENT" => Self::Development,
            "LOCAL" => Self::Local,
            "TESTING" => Self::Testing,
            other => {
                warn!(environment = other, "Unknown environment, falling back to LOCAL");
                Self::Local
            }
        }
    }

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "PRODUCTION",
            Self::Stage => "STAGE",
            Self::Integration => "INTEGRATION",
            Self::Development => "DEVELOPMENT",
            Self::Local => "LOCAL",
            Self::Testing => "TESTING",
        }
    }

    /// Whether this is one of the developer-machine deployments
    pub fn is_local_development(&self) -> bool {
        matches!(self, Self::Local | Self::Testing)
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied adjustments for local development deployments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentOverrides {
    pub port: Option<u16>,
    pub token_service: Option<String>,
    pub domain: Option<String>,
}

impl EnvironmentOverrides {
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

    fn is_empty(&self) -> bool {
        self.port.is_none() && self.token_service.is_none() && self.domain.is_none()
    }
}

/// A resolved deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    name: EnvironmentName,
    url: String,
    port: Option<u16>,
    token_service: String,
    domain: String,
}

impl Environment {
    /// Resolve a deployment by name, applying overrides where they are allowed
    pub fn resolve(name: &str, overrides: &EnvironmentOverrides) -> Self {
        Self::for_name(EnvironmentName::from_name(name), overrides)
    }

    /// Build the deployment for an already parsed name
    pub fn for_name(name: EnvironmentName, overrides: &EnvironmentOverrides) -> Self {
        let mut env = Self::predefined(name);

        if name.is_local_development() {
            if let Some(port) = overrides.port {
                env.port = Some(port);
            }
            if let Some(token_service) = &overrides.token_service {
                env.token_service = token_service.trim_end_matches('/').to_string();
            }
            if let Some(domain) = &overrides.domain {
                env.domain = domain.clone();
            }
        } else if !overrides.is_empty() {
            debug!(environment = %name, "Ignoring overrides for hosted environment");
        }

        env
    }

    fn predefined(name: EnvironmentName) -> Self {
        let (url, port, token_service, domain) = match name {
            EnvironmentName::Production => (
                "https://www.solutions.zalando.com",
                None,
                "https://token-management.norris.zalan.do",
                "solutions.zalando.com",
            ),
            EnvironmentName::Stage => (
                "https://sc-stage.norris.zalan.do",
                None,
                "https://tm-stage.norris.zalan.do",
                ".zalan.do",
            ),
            EnvironmentName::Integration => (
                "https://sc-integration.norris.zalan.do",
                None,
                "https://tm-integration.norris.zalan.do",
                ".zalan.do",
            ),
            EnvironmentName::Development => (
                "https://sc-development.norris.zalan.do",
                None,
                "https://tm-dev-ext.norris.zalan.do",
                ".zalan.do",
            ),
            EnvironmentName::Local => (
                "http://localhost",
                Some(DEFAULT_LOCAL_PORT),
                DEFAULT_LOCAL_TOKEN_SERVICE,
                "localhost",
            ),
            EnvironmentName::Testing => (
                "http://localhost",
                Some(DEFAULT_LOCAL_PORT),
                DEFAULT_TESTING_TOKEN_SERVICE,
                "localhost",
            ),
        };

        Self {
            name,
            url: url.to_string(),
            port,
            token_service: token_service.to_string(),
            domain: domain.to_string(),
        }
    }

    pub fn name(&self) -> EnvironmentName {
        self.name
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Base URL of the token service
    pub fn token_service(&self) -> &str {
        &self.token_service
    }

    /// Domain cookies are scoped to, also used to vet return destinations
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The `/tokens` resource of the token service
    pub fn token_endpoint(&self) -> String {
        format!("{}{TOKENS_RESOURCE}", self.token_service)
    }

    /// Base URL of the central Solution Center app, including the port if any
    pub fn solution_center_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.url),
            None => self.url.clone(),
        }
    }

    /// Cookies are marked secure everywhere except plain-http local development
    pub fn is_secure(&self) -> bool {
        self.name != EnvironmentName::Local
    }

    pub fn login_path(&self) -> &'static str {
        LOGIN_PATH
    }

    pub fn logout_path(&self) -> &'static str {
        LOGOUT_PATH
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::predefined(EnvironmentName::Local)
    }
}
