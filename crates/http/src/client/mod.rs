//! Token service client

pub mod error;

use crate::types::{LoginRequest, ValidationOutcome};
use error::ClientError;
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode, header};
use sc_login_core::{Token, User};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the `/tokens` resource of the token service
#[derive(Clone)]
pub struct TokenServiceClient {
    client: Client,
    endpoint: String,
}

impl TokenServiceClient {
    /// Create a new client for the given tokens endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().endpoint(endpoint).build()
    }

    /// Create a new client builder
    pub fn builder() -> TokenServiceClientBuilder {
        TokenServiceClientBuilder::default()
    }

    /// Same connection pool, different endpoint
    pub fn with_endpoint(&self, endpoint: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: endpoint.into(),
        }
    }

    /// Get the tokens endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        self.client.request(method, &self.endpoint)
    }

    /// Ask the token service whether `token` is still good
    pub async fn validate(&self, token: &Token) -> Result<ValidationOutcome, ClientError> {
        let response = self
            .request(Method::GET)
            .header(header::AUTHORIZATION, token.as_str())
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Token validation answered");

        let outcome = match status {
            StatusCode::OK => {
                let issued = authorization_token(&response);
                let body = response.text().await?;
                ValidationOutcome::Fresh {
                    token: issued.unwrap_or_else(|| token.clone()),
                    user: user_from_body(&body),
                }
            }
            StatusCode::CONFLICT => {
                let issued = authorization_token(&response);
                let body = response.text().await?;
                match issued.or_else(|| token_from_body(&body)) {
                    Some(token) => ValidationOutcome::Renewed {
                        token,
                        user: user_from_body(&body),
                    },
                    None => {
                        warn!("Token service asked for renewal without a replacement token");
                        ValidationOutcome::Rejected { status: 409 }
                    }
                }
            }
            StatusCode::NOT_MODIFIED => ValidationOutcome::Unchanged,
            other => ValidationOutcome::Rejected {
                status: other.as_u16(),
            },
        };

        Ok(outcome)
    }

    /// Exchange explicit credentials for a token
    pub async fn login(&self, request: &LoginRequest) -> Result<Token, ClientError> {
        let response = self.request(Method::POST).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(ClientError::from_status(status, message));
        }

        let body = response.text().await?;
        token_from_body(&body)
            .ok_or_else(|| ClientError::InvalidResponse("login response carried no token".into()))
    }

    /// Invalidate a token server-side
    pub async fn invalidate(&self, token: &Token) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE)
            .header(header::AUTHORIZATION, token.as_str())
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Token carried in the `Authorization` response header, with or without a scheme
fn authorization_token(response: &Response) -> Option<Token> {
    let value = response.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let value = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!value.is_empty()).then(|| Token::from(value))
}

/// Token sent as a body, either a JSON string or raw text
fn token_from_body(body: &str) -> Option<Token> {
    let body = body.trim();
    if body.is_empty() || body.starts_with('{') {
        return None;
    }
    let token = serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_string());
    (!token.is_empty()).then(|| Token::from(token))
}

fn user_from_body(body: &str) -> Option<User> {
    serde_json::from_str(body).ok().and_then(User::from_json)
}

/// Builder for TokenServiceClient
#[derive(Default)]
pub struct TokenServiceClientBuilder {
    endpoint: Option<String>,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    timeout: Option<Duration>,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    user_agent: Option<String>,
}

impl TokenServiceClientBuilder {
    /// Set the tokens endpoint
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Set the request timeout (ignored in the browser)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent (ignored in the browser, which sends its own)
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TokenServiceClient, ClientError> {
        let endpoint = self
            .endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ClientError::Configuration("endpoint is required".into()))?;

        #[allow(unused_mut)]
        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(timeout) = self.timeout {
                client_builder = client_builder.timeout(timeout);
            }
            client_builder = client_builder.user_agent(
                self.user_agent
                    .unwrap_or_else(|| format!("sc-login/{}", env!("CARGO_PKG_VERSION"))),
            );
        }

        let client = client_builder.build()?;

        Ok(TokenServiceClient { client, endpoint })
    }
}
