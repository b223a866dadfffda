//! Credential lifecycle
//!
//! A session moves through `NoToken -> Validating -> Authenticated` or ends in
//! `Redirecting` with the stored credentials cleared. Every call starts a fresh
//! cycle from whatever the [`CredentialStore`] holds; nothing is cached here and
//! overlapping calls do not coordinate (last write wins).

use crate::error::{AuthError, AuthResult, RejectReason};
use sc_login_core::{
    AuthConfig, BrandId, CookieStore, CredentialStore, Credentials, DurableStore, Environment,
    EnvironmentOverrides, InAppRouter, Navigation, Navigator, Redirector, Token, TokenClaims, User,
};
use sc_login_http::{LoginRequest, TokenServiceClient, ValidationOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Host-provided storage and navigation
#[derive(Clone)]
pub struct Backends {
    pub durable: Arc<dyn DurableStore>,
    pub cookies: Arc<dyn CookieStore>,
    pub navigator: Arc<dyn Navigator>,
    pub router: Arc<dyn InAppRouter>,
}

/// Lifecycle states, as they appear in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoToken,
    Validating,
    Authenticated,
    Redirecting,
}

/// Result of an [`AuthenticationService::authenticate`] cycle
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Credentials were validated and committed
    Authenticated(Credentials),
    /// Credentials were cleared and the user sent to login
    Redirected {
        reason: RejectReason,
        navigation: Navigation,
    },
}

impl AuthOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Authenticated(credentials) => Some(credentials),
            Self::Redirected { .. } => None,
        }
    }
}

/// Validates, renews and clears the session of a Solution Center app
#[derive(Clone)]
pub struct AuthenticationService {
    environment: Environment,
    store: CredentialStore,
    redirector: Redirector,
    client: TokenServiceClient,
    user_agent: Option<String>,
}

impl AuthenticationService {
    pub fn new(config: &AuthConfig, backends: Backends) -> AuthResult<Self> {
        let environment = config.environment();
        let client = TokenServiceClient::new(environment.token_endpoint())
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        let store = CredentialStore::new(backends.durable, backends.cookies)
            .with_prefix(config.storage_prefix.clone())
            .with_cookie_ttl_days(config.cookie_ttl_days);
        let redirector = Redirector::new(backends.navigator, backends.router)
            .with_internal_communication(config.internal_communication);

        debug!(
            environment = %environment.name(),
            endpoint = client.endpoint(),
            "Authentication service configured"
        );

        Ok(Self {
            environment,
            store,
            redirector,
            client,
            user_agent: None,
        })
    }

    /// User agent of the current browser, matched against the `agent` claim
    /// and sent along with explicit logins
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use a preconfigured HTTP client (timeouts, user agent); the endpoint
    /// still follows the active environment
    pub fn with_client(mut self, client: TokenServiceClient) -> Self {
        self.client = client.with_endpoint(self.environment.token_endpoint());
        self
    }

    /// Switch to another deployment
    pub fn configure_environment(
        &mut self,
        name: &str,
        overrides: &EnvironmentOverrides,
    ) -> &Environment {
        self.environment = Environment::resolve(name, overrides);
        self.client = self.client.with_endpoint(self.environment.token_endpoint());
        info!(
            environment = %self.environment.name(),
            endpoint = self.client.endpoint(),
            "Environment configured"
        );
        &self.environment
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn redirector(&self) -> &Redirector {
        &self.redirector
    }

    /// Validate the stored token against the token service.
    ///
    /// Never fails: on rejection the credentials are cleared and the user is
    /// sent to login, with `redirect_target` as return destination when it
    /// lies inside the configured domain.
    pub async fn authenticate(&self, redirect_target: Option<&str>) -> AuthOutcome {
        match self.validate_stored().await {
            Ok(credentials) => AuthOutcome::Authenticated(credentials),
            Err(reason) => {
                let navigation = self.reject(&reason, redirect_target);
                AuthOutcome::Redirected { reason, navigation }
            }
        }
    }

    /// Route guard: authenticate, coming back to `current_url` after login
    pub async fn require_authenticated_user(&self, current_url: &str) -> AuthOutcome {
        let target = urlencoding::encode(current_url);
        self.authenticate(Some(&*target)).await
    }

    /// Send already signed-in users home. Returns whether a redirect happened.
    pub fn redirect_to_home_if_authenticated(&self) -> bool {
        if self.is_authenticated() {
            self.redirector.redirect(Some("/"), &self.environment);
            true
        } else {
            false
        }
    }

    /// A user profile is stored. Does not contact the token service.
    pub fn is_authenticated(&self) -> bool {
        self.store.get_user().is_some()
    }

    /// Exchange explicit credentials for a token and store it
    pub async fn login(&self, identifier: &str, secret: &str) -> AuthResult<Token> {
        let request = LoginRequest {
            email: identifier.to_string(),
            password: secret.to_string(),
            agent: self.user_agent.clone(),
        };

        let token = self.client.login(&request).await.map_err(|err| {
            warn!(error = %err, "Login failed");
            AuthError::WrongCredentials
        })?;

        self.store.set_token(&token, &self.environment)?;
        match decoded_user(&token) {
            Some(user) => self.store.set_user(&user)?,
            None => self.store.clear_user()?,
        }
        info!(environment = %self.environment.name(), "Logged in");
        Ok(token)
    }

    /// Login followed by validation, never redirecting
    pub async fn silent_login(&self, identifier: &str, secret: &str) -> AuthResult<Credentials> {
        self.login(identifier, secret).await?;

        self.validate_stored().await.map_err(|reason| {
            warn!(%reason, "Validation after login failed");
            self.discard_credentials();
            AuthError::Rejected(reason)
        })
    }

    /// Invalidate the session and send the user to login
    pub async fn logout(&self) -> Navigation {
        self.silent_logout().await;
        debug!(state = ?SessionState::Redirecting, "Sending the user to login");
        self.redirector.redirect_to_login(None, &self.environment)
    }

    /// Invalidate the session without navigating. The server-side invalidation
    /// is best effort; local credentials are always cleared.
    pub async fn silent_logout(&self) {
        match self.store.get_token() {
            Some(token) => {
                if let Err(err) = self.client.invalidate(&token).await {
                    warn!(error = %err, "Token invalidation failed, clearing the session anyway");
                }
            }
            None => debug!("No token to invalidate"),
        }

        self.discard_credentials();
        info!(environment = %self.environment.name(), "Logged out");
    }

    /// Navigate to a path of the central app
    pub fn redirect(&self, path: Option<&str>) -> Navigation {
        self.redirector.redirect(path, &self.environment)
    }

    pub fn token(&self) -> Option<Token> {
        self.store.get_token()
    }

    pub fn set_token(&self, token: &Token) -> AuthResult<()> {
        Ok(self.store.set_token(token, &self.environment)?)
    }

    pub fn user(&self) -> Option<User> {
        self.store.get_user()
    }

    pub fn brand(&self) -> Option<BrandId> {
        self.store.get_brand()
    }

    pub fn set_brand(&self, brand: &BrandId) -> AuthResult<()> {
        Ok(self.store.set_brand(brand, &self.environment)?)
    }

    pub fn clear_brand(&self) -> AuthResult<()> {
        Ok(self.store.clear_brand(&self.environment)?)
    }

    pub fn clear_credentials(&self) -> AuthResult<()> {
        Ok(self.store.clear_credentials(&self.environment)?)
    }

    async fn validate_stored(&self) -> Result<Credentials, RejectReason> {
        let Some(token) = self.store.get_token() else {
            debug!(state = ?SessionState::NoToken, "No token stored");
            return Err(RejectReason::NoToken);
        };

        if self.is_foreign_token(&token) {
            return Err(RejectReason::AgentMismatch);
        }

        debug!(
            state = ?SessionState::Validating,
            endpoint = self.client.endpoint(),
            "Validating token"
        );

        let outcome = self.client.validate(&token).await.map_err(|err| {
            warn!(error = %err, "Token validation request failed");
            RejectReason::Transport
        })?;

        let credentials = match outcome {
            ValidationOutcome::Fresh { token, user } => {
                let user = user.or_else(|| decoded_user(&token)).unwrap_or_default();
                Credentials { token, user }
            }
            ValidationOutcome::Renewed { token, user } => {
                debug!("Token renewed by the token service");
                let user = user.or_else(|| decoded_user(&token)).unwrap_or_default();
                Credentials { token, user }
            }
            ValidationOutcome::Unchanged => {
                let user = self
                    .store
                    .get_user()
                    .or_else(|| decoded_user(&token))
                    .unwrap_or_default();
                Credentials { token, user }
            }
            ValidationOutcome::Rejected { status } => {
                return Err(RejectReason::ServerRejected { status });
            }
        };

        self.store
            .store_credentials(&credentials, &self.environment)
            .map_err(|err| {
                warn!(error = %err, "Failed to store validated credentials");
                RejectReason::Storage
            })?;

        debug!(state = ?SessionState::Authenticated, "Token accepted");
        Ok(credentials)
    }

    /// The token records a user agent other than ours
    fn is_foreign_token(&self, token: &Token) -> bool {
        let Some(current) = self.user_agent.as_deref() else {
            return false;
        };

        match token.claims() {
            Ok(claims) => match claims.agent() {
                Some(issued) if issued != current => {
                    debug!(issued, current, "Token was issued to another user agent");
                    true
                }
                _ => false,
            },
            Err(err) => {
                debug!(error = %err, "Token payload unreadable, leaving it to the token service");
                false
            }
        }
    }

    fn reject(&self, reason: &RejectReason, redirect_target: Option<&str>) -> Navigation {
        self.discard_credentials();
        debug!(state = ?SessionState::Redirecting, %reason, "Sending the user to login");
        self.redirector
            .redirect_to_login(redirect_target, &self.environment)
    }

    fn discard_credentials(&self) {
        if let Err(err) = self.store.clear_credentials(&self.environment) {
            warn!(error = %err, "Failed to clear stored credentials");
        }
    }
}

fn decoded_user(token: &Token) -> Option<User> {
    token.claims().ok().map(TokenClaims::into_user)
}
