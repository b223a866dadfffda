//! Terminal stand-ins for browser navigation

use sc_login_core::{InAppRouter, Navigator};

/// Prints where a browser would have gone
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, url: &str) {
        println!("Open {url}");
    }
}

impl InAppRouter for PrintNavigator {
    fn navigate(&self, path: &str) {
        println!("Route to {path}");
    }
}
