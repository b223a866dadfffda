//! Window navigation and hash routing

use gloo::timers::callback::Timeout;
use sc_login_core::{InAppRouter, Navigator};
use tracing::warn;

/// Full page loads through `window.location`
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn navigate(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            warn!(url, "No window to navigate");
            return;
        };
        if let Err(err) = window.location().set_href(url) {
            warn!(url, error = ?err, "Navigation failed");
        }
    }
}

/// Routes of hash-based apps, changed on the next tick
#[derive(Debug, Clone, Copy, Default)]
pub struct HashRouter;

impl InAppRouter for HashRouter {
    fn navigate(&self, path: &str) {
        let path = path.to_string();
        Timeout::new(0, move || {
            let Some(window) = web_sys::window() else {
                warn!(path = %path, "No window to route in");
                return;
            };
            if let Err(err) = window.location().set_hash(&path) {
                warn!(path = %path, error = ?err, "Routing failed");
            }
        })
        .forget();
    }
}
