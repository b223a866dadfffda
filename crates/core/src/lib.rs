//! Solution Center login core types and utilities
//!
//! Environments, credential storage, token decoding and redirection. The
//! credential lifecycle that ties them together lives in `sc-login-auth`.

pub mod config;
pub mod environment;
pub mod error;
pub mod redirect;
pub mod storage;
pub mod token;

#[cfg(not(target_arch = "wasm32"))]
pub mod tracing;

pub use config::AuthConfig;
pub use environment::{Environment, EnvironmentName, EnvironmentOverrides, LOGIN_PATH, LOGOUT_PATH};
pub use error::{CoreError, CoreResult};
pub use redirect::{InAppRouter, Navigation, Navigator, Redirector};
pub use storage::{CookieOptions, CookieStore, CredentialStore, DurableStore};
pub use token::{BrandId, Credentials, Token, TokenClaims, User};
