//! Wire types of the token service

use sc_login_core::{Token, User};
use serde::{Deserialize, Serialize};

/// Body of `POST /tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// Result of `GET /tokens`, one variant per response class
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// 200: the token is valid; the service may have re-issued it
    Fresh { token: Token, user: Option<User> },
    /// 409: the token must be replaced by the one supplied
    Renewed { token: Token, user: Option<User> },
    /// 304: the token sent is still valid as-is
    Unchanged,
    /// Any other status
    Rejected { status: u16 },
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}
