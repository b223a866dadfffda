//! Browser back-ends for Solution Center login
//!
//! Wires [`AuthenticationService`] to `localStorage`, `document.cookie`,
//! `window.location` and hash routing.

pub mod logging;
pub mod navigation;
pub mod storage;

pub use logging::init_logging;
pub use navigation::{HashRouter, WindowNavigator};
pub use storage::{DocumentCookieStore, LocalStorageStore};

use sc_login_auth::{AuthResult, AuthenticationService, Backends};
use sc_login_core::AuthConfig;
use std::sync::Arc;

/// User agent of the current browser
pub fn user_agent() -> Option<String> {
    web_sys::window()?.navigator().user_agent().ok()
}

/// Back-ends of the current page
pub fn backends() -> Backends {
    Backends {
        durable: Arc::new(LocalStorageStore),
        cookies: Arc::new(DocumentCookieStore),
        navigator: Arc::new(WindowNavigator),
        router: Arc::new(HashRouter),
    }
}

/// Authentication service for the current page, matching tokens against
/// this browser's user agent
pub fn authentication_service(config: &AuthConfig) -> AuthResult<AuthenticationService> {
    let service = AuthenticationService::new(config, backends())?;
    Ok(match user_agent() {
        Some(agent) => service.with_user_agent(agent),
        None => service,
    })
}
