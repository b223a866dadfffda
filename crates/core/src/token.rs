//! Token, user profile and brand types
//!
//! Tokens are opaque JWTs. They are only ever decoded to read display data
//! and the optional `agent` claim; signatures are the token service's concern.

use crate::error::{CoreError, CoreResult};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Claim carrying the user agent of the browser the token was issued to
pub const AGENT_CLAIM: &str = "agent";

/// Bearer token issued by the token service
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload segment without verifying anything
    pub fn claims(&self) -> CoreResult<TokenClaims> {
        let payload = self
            .0
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| CoreError::malformed_token("missing payload segment"))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| CoreError::malformed_token(format!("invalid base64: {e}")))?;

        match serde_json::from_slice::<JsonValue>(&bytes)? {
            JsonValue::Object(map) => Ok(TokenClaims(map)),
            _ => Err(CoreError::malformed_token("payload is not a JSON object")),
        }
    }
}

// Tokens are credentials, keep them out of logs
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} bytes>)", self.0.len())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Decoded JWT payload
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims(Map<String, JsonValue>);

impl TokenClaims {
    /// User agent recorded when the token was issued, if any
    pub fn agent(&self) -> Option<&str> {
        self.0.get(AGENT_CLAIM).and_then(JsonValue::as_str)
    }

    pub fn get(&self, claim: &str) -> Option<&JsonValue> {
        self.0.get(claim)
    }

    /// The payload as a user profile
    pub fn into_user(self) -> User {
        User(self.0)
    }
}

/// User profile derived from the token or returned by the token service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, JsonValue>);

impl User {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }

    /// Accept any JSON object as a profile
    pub fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(JsonValue::as_str)
    }

    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.0
    }
}

/// Tenant/brand context the user is browsing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(String);

impl BrandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrandId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The active session: token plus the profile stored with it
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub token: Token,
    pub user: User,
}
