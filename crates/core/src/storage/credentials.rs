//! Read/write facade over the durable store and the cookie jar

use super::{CookieOptions, CookieStore, DurableStore};
use crate::environment::Environment;
use crate::error::CoreResult;
use crate::token::{BrandId, Credentials, Token, User};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cookie carrying the token across the apps of the domain
pub const TOKEN_COOKIE_KEY: &str = "SC_TOKEN";

/// Cookie carrying the brand across the apps of the domain
pub const BRAND_COOKIE_KEY: &str = "SC_BRAND";

/// Namespace for the durable keys of this application
pub const DEFAULT_STORAGE_PREFIX: &str = "solutionCenter-";

pub const DEFAULT_COOKIE_TTL_DAYS: u32 = 7;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Credential store with a fixed read precedence: durable store first,
/// cookie second. Writes go to both so they stay in sync.
#[derive(Clone)]
pub struct CredentialStore {
    durable: Arc<dyn DurableStore>,
    cookies: Arc<dyn CookieStore>,
    prefix: String,
    cookie_ttl: Duration,
}

impl CredentialStore {
    pub fn new(durable: Arc<dyn DurableStore>, cookies: Arc<dyn CookieStore>) -> Self {
        Self {
            durable,
            cookies,
            prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            cookie_ttl: Duration::from_secs(u64::from(DEFAULT_COOKIE_TTL_DAYS) * SECONDS_PER_DAY),
        }
    }

    /// Namespace durable keys with a different prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Lifetime of the token and brand cookies
    pub fn with_cookie_ttl_days(mut self, days: u32) -> Self {
        self.cookie_ttl = Duration::from_secs(u64::from(days) * SECONDS_PER_DAY);
        self
    }

    fn key(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    fn cookie_options(&self, env: &Environment) -> CookieOptions {
        CookieOptions {
            domain: env.domain().to_string(),
            secure: env.is_secure(),
            max_age: self.cookie_ttl,
        }
    }

    fn read(&self, key: &str, cookie: &str) -> Option<String> {
        self.durable
            .get(&self.key(key))
            .filter(|value| !value.is_empty())
            .or_else(|| self.cookies.get(cookie).filter(|value| !value.is_empty()))
    }

    fn write(&self, key: &str, cookie: &str, value: &str, env: &Environment) -> CoreResult<()> {
        self.durable.set(&self.key(key), value)?;
        self.cookies.put(cookie, value, &self.cookie_options(env))
    }

    fn erase(&self, key: &str, cookie: &str, env: &Environment) -> CoreResult<()> {
        self.durable.remove(&self.key(key))?;
        self.cookies.remove(cookie, &self.cookie_options(env))
    }

    pub fn get_token(&self) -> Option<Token> {
        self.read("token", TOKEN_COOKIE_KEY).map(Token::from)
    }

    pub fn set_token(&self, token: &Token, env: &Environment) -> CoreResult<()> {
        self.write("token", TOKEN_COOKIE_KEY, token.as_str(), env)
    }

    pub fn clear_token(&self, env: &Environment) -> CoreResult<()> {
        self.erase("token", TOKEN_COOKIE_KEY, env)
    }

    /// Stored profile; an unreadable entry counts as no profile
    pub fn get_user(&self) -> Option<User> {
        let raw = self.durable.get(&self.key("user"))?;
        match serde_json::from_str::<Option<User>>(&raw) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable stored user profile");
                None
            }
        }
    }

    pub fn set_user(&self, user: &User) -> CoreResult<()> {
        let serialized = serde_json::to_string(user)?;
        self.durable.set(&self.key("user"), &serialized)
    }

    pub fn clear_user(&self) -> CoreResult<()> {
        self.durable.remove(&self.key("user"))
    }

    pub fn get_brand(&self) -> Option<BrandId> {
        self.read("brand", BRAND_COOKIE_KEY).map(BrandId::new)
    }

    pub fn set_brand(&self, brand: &BrandId, env: &Environment) -> CoreResult<()> {
        self.write("brand", BRAND_COOKIE_KEY, brand.as_str(), env)
    }

    pub fn clear_brand(&self, env: &Environment) -> CoreResult<()> {
        self.erase("brand", BRAND_COOKIE_KEY, env)
    }

    /// Commit a token/profile pair
    pub fn store_credentials(&self, credentials: &Credentials, env: &Environment) -> CoreResult<()> {
        self.set_token(&credentials.token, env)?;
        self.set_user(&credentials.user)
    }

    /// The active session, if both halves are present
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            token: self.get_token()?,
            user: self.get_user()?,
        })
    }

    /// Remove token, user and brand. Every removal is attempted even if an
    /// earlier one fails; the first failure is reported.
    pub fn clear_credentials(&self, env: &Environment) -> CoreResult<()> {
        debug!("Clearing stored credentials");
        let results = [
            self.clear_token(env),
            self.clear_user(),
            self.clear_brand(env),
        ];
        results.into_iter().collect()
    }
}
