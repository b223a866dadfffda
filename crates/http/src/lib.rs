//! Solution Center token service client
//!
//! Thin typed wrapper over the `/tokens` resource: validation, login and
//! invalidation. Works natively and in the browser.

pub mod client;
pub mod types;

pub use client::TokenServiceClient;
pub use client::error::ClientError;
pub use types::{LoginRequest, ValidationOutcome};
