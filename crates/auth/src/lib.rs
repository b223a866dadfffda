//! Token validation and credential lifecycle for Solution Center apps
//!
//! [`AuthenticationService`] ties the environment, the credential store, the
//! token service client and the redirector together.

pub mod error;
pub mod service;

pub use error::{AuthError, AuthResult, RejectReason};
pub use service::{AuthOutcome, AuthenticationService, Backends, SessionState};
