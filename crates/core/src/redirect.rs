//! Navigation between the embedding app and the central Solution Center app

use crate::environment::{Environment, LOGIN_PATH, LOGOUT_PATH};
use std::sync::Arc;
use tracing::debug;

/// Query parameter carrying the return destination to the login page
pub const REDIRECT_PARAM: &str = "redirect";

/// Full page navigation, e.g. assigning `window.location.href`
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// In-app routing for hosts sharing an origin with the central app.
///
/// Implementations must not navigate synchronously: the route change is
/// scheduled for the next tick so the current render cycle can finish.
pub trait InAppRouter: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Where a redirect went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Routed inside the current app
    InApp(String),
    /// Full page load of the given URL
    FullPage(String),
}

/// Computes login/logout destinations and dispatches navigation
#[derive(Clone)]
pub struct Redirector {
    navigator: Arc<dyn Navigator>,
    router: Arc<dyn InAppRouter>,
    internal_communication: bool,
}

impl Redirector {
    pub fn new(navigator: Arc<dyn Navigator>, router: Arc<dyn InAppRouter>) -> Self {
        Self {
            navigator,
            router,
            internal_communication: false,
        }
    }

    /// Mark the host as living on the same origin as the central app
    pub fn with_internal_communication(mut self, enabled: bool) -> Self {
        self.internal_communication = enabled;
        self
    }

    pub fn is_internal_communication(&self) -> bool {
        self.internal_communication
    }

    /// Login path, carrying the return destination only when it points
    /// inside the configured domain
    pub fn login_path(&self, redirect_target: Option<&str>, env: &Environment) -> String {
        match redirect_target {
            Some(target) if is_valid_redirection(target, env) => {
                format!("{LOGIN_PATH}?{REDIRECT_PARAM}={target}")
            }
            Some(target) => {
                debug!(destination = target, "Dropping return destination outside of the domain");
                LOGIN_PATH.to_string()
            }
            None => LOGIN_PATH.to_string(),
        }
    }

    pub fn logout_path(&self) -> &'static str {
        LOGOUT_PATH
    }

    /// Navigate to a path of the central app; an empty path means home
    pub fn redirect(&self, path: Option<&str>, env: &Environment) -> Navigation {
        let path = path.filter(|p| !p.is_empty()).unwrap_or("/");

        if self.internal_communication {
            debug!(path, "Routing inside the app");
            self.router.navigate(path);
            Navigation::InApp(path.to_string())
        } else {
            let url = format!("{}/#{path}", env.solution_center_url());
            debug!(url, "Navigating to the Solution Center");
            self.navigator.navigate(&url);
            Navigation::FullPage(url)
        }
    }

    /// Send the user to the login page, remembering where they came from
    pub fn redirect_to_login(&self, redirect_target: Option<&str>, env: &Environment) -> Navigation {
        let path = self.login_path(redirect_target, env);
        self.redirect(Some(&path), env)
    }
}

fn is_valid_redirection(target: &str, env: &Environment) -> bool {
    let domain = env.domain();
    !domain.is_empty() && !target.is_empty() && target.contains(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::EnvironmentOverrides;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        visited: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn visited(&self) -> Vec<String> {
            self.visited.lock().unwrap().clone()
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, url: &str) {
            self.visited.lock().unwrap().push(url.to_string());
        }
    }

    impl InAppRouter for Recorder {
        fn navigate(&self, path: &str) {
            self.visited.lock().unwrap().push(path.to_string());
        }
    }

    fn redirector(internal: bool) -> (Arc<Recorder>, Arc<Recorder>, Redirector) {
        let navigator = Arc::new(Recorder::default());
        let router = Arc::new(Recorder::default());
        let redirector = Redirector::new(navigator.clone(), router.clone())
            .with_internal_communication(internal);
        (navigator, router, redirector)
    }

    fn production() -> Environment {
        Environment::resolve("PRODUCTION", &EnvironmentOverrides::default())
    }

    #[test]
    fn test_login_path_keeps_same_domain_target() {
        let (_, _, redirector) = redirector(false);
        let target = "https%3A%2F%2Fapp.solutions.zalando.com%2Forders";

        assert_eq!(
            redirector.login_path(Some(target), &production()),
            format!("/login?redirect={target}")
        );
    }

    #[test]
    fn test_login_path_drops_foreign_target() {
        let (_, _, redirector) = redirector(false);
        let env = production();

        assert_eq!(redirector.login_path(Some("https://evil.example"), &env), "/login");
        assert_eq!(redirector.login_path(Some(""), &env), "/login");
        assert_eq!(redirector.login_path(None, &env), "/login");
    }

    #[test]
    fn test_login_path_without_domain_drops_every_target() {
        let (_, _, redirector) = redirector(false);
        let env = Environment::resolve("LOCAL", &EnvironmentOverrides::default().with_domain(""));

        assert_eq!(
            redirector.login_path(Some("https://evil.example.com/"), &env),
            "/login"
        );
        assert_eq!(
            redirector.login_path(Some("http%3A%2F%2Flocalhost%3A4000%2F"), &env),
            "/login"
        );
    }

    #[test]
    fn test_external_redirect_is_full_page() {
        let (navigator, router, redirector) = redirector(false);

        let navigation = redirector.redirect(Some("/login"), &production());

        let expected = "https://www.solutions.zalando.com/#/login".to_string();
        assert_eq!(navigation, Navigation::FullPage(expected.clone()));
        assert_eq!(navigator.visited(), vec![expected]);
        assert!(router.visited().is_empty());
    }

    #[test]
    fn test_internal_redirect_uses_router() {
        let (navigator, router, redirector) = redirector(true);

        let navigation = redirector.redirect(Some("/login"), &production());

        assert_eq!(navigation, Navigation::InApp("/login".to_string()));
        assert_eq!(router.visited(), vec!["/login".to_string()]);
        assert!(navigator.visited().is_empty());
    }

    #[test]
    fn test_missing_path_goes_home() {
        let (_, router, redirector) = redirector(true);
        redirector.redirect(None, &production());
        redirector.redirect(Some(""), &production());
        assert_eq!(router.visited(), vec!["/".to_string(), "/".to_string()]);
    }

    #[test]
    fn test_local_redirect_includes_port() {
        let (navigator, _, redirector) = redirector(false);
        redirector.redirect_to_login(Some("http%3A%2F%2Flocalhost%3A4000%2F"), &Environment::default());

        assert_eq!(
            navigator.visited(),
            vec!["http://localhost:3333/#/login?redirect=http%3A%2F%2Flocalhost%3A4000%2F".to_string()]
        );
    }

    #[test]
    fn test_logout_path() {
        let (_, _, redirector) = redirector(false);
        assert_eq!(redirector.logout_path(), "/logout");
    }
}
