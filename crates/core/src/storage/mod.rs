//! Credential storage
//!
//! Two physical back-ends hold the session: a durable key/value store
//! (browser local storage) and a cookie store shared across the apps of the
//! domain. [`CredentialStore`] writes both and reads durable-first.

mod credentials;
mod memory;

pub use credentials::{
    BRAND_COOKIE_KEY, CredentialStore, DEFAULT_COOKIE_TTL_DAYS, DEFAULT_STORAGE_PREFIX,
    TOKEN_COOKIE_KEY,
};
pub use memory::{MemoryCookieStore, MemoryDurableStore, StoredCookie};

use crate::error::CoreResult;
use std::time::Duration;

/// Durable key/value storage that survives reloads
pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Cookie jar visible to every app under the configured domain
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn put(&self, name: &str, value: &str, options: &CookieOptions) -> CoreResult<()>;

    /// Expire a cookie; the domain must match the one it was written with
    fn remove(&self, name: &str, options: &CookieOptions) -> CoreResult<()>;
}

/// Attributes applied when writing a cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub domain: String,
    pub secure: bool,
    pub max_age: Duration,
}
