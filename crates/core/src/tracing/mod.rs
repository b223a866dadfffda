//! Tracing setup for native hosts
//!
//! Browser hosts install their subscriber through `sc-login-browser`.

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::{init_default, init_tracing};
