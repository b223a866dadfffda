//! Authentication error types

use sc_login_core::CoreError;
use thiserror::Error;

/// Result type for lifecycle operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a stored session was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Nothing stored, no request made
    #[error("no token stored")]
    NoToken,

    /// Token was issued to another browser, no request made
    #[error("token was issued to a different user agent")]
    AgentMismatch,

    /// Token service answered with a status other than 200, 304 or 409
    #[error("token service rejected the token with status {status}")]
    ServerRejected { status: u16 },

    /// Token service could not be reached
    #[error("token service unreachable")]
    Transport,

    /// The accepted session could not be written back
    #[error("credentials could not be stored")]
    Storage,
}

/// Errors surfaced to callers of the explicit login/logout paths
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login refused or failed; the message is meant for display
    #[error("Wrong credentials")]
    WrongCredentials,

    /// Validation after a silent login failed
    #[error("Authentication rejected: {0}")]
    Rejected(RejectReason),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),
}
