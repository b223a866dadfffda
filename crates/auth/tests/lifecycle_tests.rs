//! Integration tests for the credential lifecycle against a mocked token service

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sc_login_auth::{AuthError, AuthOutcome, AuthenticationService, Backends, RejectReason};
use sc_login_core::storage::{MemoryCookieStore, MemoryDurableStore, TOKEN_COOKIE_KEY};
use sc_login_core::{
    AuthConfig, BrandId, EnvironmentOverrides, InAppRouter, Navigation, Navigator, Token, User,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    pages: Mutex<Vec<String>>,
    routes: Mutex<Vec<String>>,
}

impl Recorder {
    fn pages(&self) -> Vec<String> {
        self.pages.lock().unwrap().clone()
    }

    fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for Recorder {
    fn navigate(&self, url: &str) {
        self.pages.lock().unwrap().push(url.to_string());
    }
}

impl InAppRouter for Recorder {
    fn navigate(&self, path: &str) {
        self.routes.lock().unwrap().push(path.to_string());
    }
}

struct Harness {
    service: AuthenticationService,
    durable: MemoryDurableStore,
    cookies: MemoryCookieStore,
    recorder: Arc<Recorder>,
}

fn harness_with(config: AuthConfig) -> Harness {
    let durable = MemoryDurableStore::new();
    let cookies = MemoryCookieStore::new();
    let recorder = Arc::new(Recorder::default());

    let service = AuthenticationService::new(
        &config,
        Backends {
            durable: Arc::new(durable.clone()),
            cookies: Arc::new(cookies.clone()),
            navigator: recorder.clone(),
            router: recorder.clone(),
        },
    )
    .unwrap();

    Harness {
        service,
        durable,
        cookies,
        recorder,
    }
}

fn harness(server: &MockServer) -> Harness {
    harness_with(AuthConfig::new("TESTING").with_token_service(server.uri()))
}

fn unsigned_token(payload: Value) -> Token {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    Token::new(format!("{header}.{body}.signature"))
}

fn user(fields: Value) -> User {
    User::from_json(fields).unwrap()
}

fn assert_cleared(h: &Harness) {
    assert_eq!(h.service.token(), None);
    assert_eq!(h.service.user(), None);
    assert_eq!(h.service.brand(), None);
    assert!(h.durable.is_empty());
}

#[tokio::test]
async fn test_ok_stores_returned_token_and_decoded_profile() {
    let server = MockServer::start().await;
    let h = harness(&server);

    let sent = unsigned_token(json!({ "email": "old@example.com" }));
    let returned = unsigned_token(json!({ "email": "user@example.com" }));
    h.service.set_token(&sent).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .and(header("authorization", sent.as_str()))
        .respond_with(ResponseTemplate::new(200).insert_header("authorization", returned.as_str()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = h.service.authenticate(None).await;

    assert!(outcome.is_authenticated());
    assert_eq!(h.service.token(), Some(returned.clone()));
    assert_eq!(
        h.service.user().and_then(|u| u.email().map(String::from)),
        Some("user@example.com".to_string())
    );
    assert_eq!(h.cookies.cookie(TOKEN_COOKIE_KEY).unwrap().value, returned.as_str());
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_ok_prefers_profile_from_body() {
    let server = MockServer::start().await;
    let h = harness(&server);
    h.service.set_token(&Token::from("opaque")).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "email": "body@example.com" })),
        )
        .mount(&server)
        .await;

    let outcome = h.service.authenticate(None).await;

    let credentials = outcome.credentials().unwrap();
    assert_eq!(credentials.token, Token::from("opaque"));
    assert_eq!(credentials.user, user(json!({ "email": "body@example.com" })));
    assert_eq!(h.service.user(), Some(credentials.user.clone()));
}

#[tokio::test]
async fn test_conflict_replaces_token() {
    let server = MockServer::start().await;
    let h = harness(&server);

    let renewed = unsigned_token(json!({ "email": "renewed@example.com" }));
    h.service.set_token(&Token::from("tok-1")).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!(renewed.as_str())))
        .mount(&server)
        .await;

    let outcome = h.service.authenticate(Some("http://localhost:3333/#/orders")).await;

    assert!(outcome.is_authenticated());
    assert_eq!(h.service.token(), Some(renewed));
    assert_eq!(
        h.service.user(),
        Some(user(json!({ "email": "renewed@example.com" })))
    );
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_not_modified_keeps_token_and_profile() {
    let server = MockServer::start().await;
    let h = harness(&server);

    let profile = user(json!({ "email": "kept@example.com" }));
    h.service.set_token(&Token::from("tok-1")).unwrap();
    h.service.store().set_user(&profile).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let outcome = h.service.authenticate(None).await;

    assert!(outcome.is_authenticated());
    assert_eq!(h.service.token(), Some(Token::from("tok-1")));
    assert_eq!(h.service.user(), Some(profile));
}

#[tokio::test]
async fn test_rejection_clears_and_redirects_with_target() {
    let server = MockServer::start().await;
    let h = harness(&server);

    h.service.set_token(&Token::from("tok-1")).unwrap();
    h.service.store().set_user(&user(json!({ "email": "x" }))).unwrap();
    h.service.set_brand(&BrandId::from("brand-1")).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let outcome = h.service.authenticate(Some("http://localhost:3333/#/orders")).await;

    let expected = "http://localhost:3333/#/login?redirect=http://localhost:3333/#/orders";
    assert_eq!(
        outcome,
        AuthOutcome::Redirected {
            reason: RejectReason::ServerRejected { status: 401 },
            navigation: Navigation::FullPage(expected.to_string()),
        }
    );
    assert_cleared(&h);
    assert_eq!(h.recorder.pages(), vec![expected.to_string()]);
}

#[tokio::test]
async fn test_rejection_drops_foreign_target() {
    let server = MockServer::start().await;
    let h = harness(&server);
    h.service.set_token(&Token::from("tok-1")).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    h.service.authenticate(Some("https://evil.example.com/")).await;

    assert_eq!(
        h.recorder.pages(),
        vec!["http://localhost:3333/#/login".to_string()]
    );
}

#[tokio::test]
async fn test_empty_domain_drops_every_target() {
    let server = MockServer::start().await;
    let h = harness_with(
        AuthConfig::new("LOCAL")
            .with_domain("")
            .with_token_service(server.uri()),
    );
    h.service.set_token(&Token::from("tok-1")).unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    h.service.authenticate(Some("https://evil.example.com/")).await;

    assert_eq!(
        h.recorder.pages(),
        vec!["http://localhost:3333/#/login".to_string()]
    );
}

#[tokio::test]
async fn test_missing_token_redirects_without_request() {
    let server = MockServer::start().await;
    let h = harness(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = h.service.authenticate(None).await;

    assert!(matches!(
        outcome,
        AuthOutcome::Redirected {
            reason: RejectReason::NoToken,
            ..
        }
    ));
    assert_cleared(&h);
    assert_eq!(
        h.recorder.pages(),
        vec!["http://localhost:3333/#/login".to_string()]
    );
}

#[tokio::test]
async fn test_agent_mismatch_short_circuits() {
    let server = MockServer::start().await;
    let h = harness(&server);
    let service = h.service.clone().with_user_agent("Mozilla/5.0");

    service
        .set_token(&unsigned_token(json!({ "agent": "curl/8.0" })))
        .unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = service.authenticate(None).await;

    assert!(matches!(
        outcome,
        AuthOutcome::Redirected {
            reason: RejectReason::AgentMismatch,
            ..
        }
    ));
    assert_eq!(service.token(), None);
}

#[tokio::test]
async fn test_matching_agent_is_validated() {
    let server = MockServer::start().await;
    let h = harness(&server);
    let service = h.service.clone().with_user_agent("Mozilla/5.0");

    service
        .set_token(&unsigned_token(json!({ "agent": "Mozilla/5.0" })))
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    assert!(service.authenticate(None).await.is_authenticated());
}

#[tokio::test]
async fn test_unreachable_service_is_rejection() {
    let h = harness_with(AuthConfig::new("TESTING").with_token_service("http://127.0.0.1:9"));
    h.service.set_token(&Token::from("tok-1")).unwrap();

    let outcome = h.service.authenticate(None).await;

    assert!(matches!(
        outcome,
        AuthOutcome::Redirected {
            reason: RejectReason::Transport,
            ..
        }
    ));
    assert_cleared(&h);
}

#[tokio::test]
async fn test_route_guard_encodes_current_url() {
    let server = MockServer::start().await;
    let h = harness(&server);

    let outcome = h
        .service
        .require_authenticated_user("http://localhost:3333/#/orders?id=1")
        .await;

    assert_eq!(
        outcome,
        AuthOutcome::Redirected {
            reason: RejectReason::NoToken,
            navigation: Navigation::FullPage(
                "http://localhost:3333/#/login?redirect=http%3A%2F%2Flocalhost%3A3333%2F%23%2Forders%3Fid%3D1"
                    .to_string()
            ),
        }
    );
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    let h = harness(&server);
    let service = h.service.clone().with_user_agent("Mozilla/5.0");

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .and(body_json(json!({
            "email": "user@example.com",
            "password": "secret",
            "agent": "Mozilla/5.0",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok-abc")))
        .expect(1)
        .mount(&server)
        .await;

    let token = service.login("user@example.com", "secret").await.unwrap();

    assert_eq!(token, Token::from("tok-abc"));
    assert_eq!(service.token(), Some(Token::from("tok-abc")));
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_login_replaces_previous_profile() {
    let server = MockServer::start().await;
    let h = harness(&server);

    h.service.set_token(&Token::from("tok-a")).unwrap();
    h.service
        .store()
        .set_user(&user(json!({ "email": "alice@example.com" })))
        .unwrap();

    let bob = unsigned_token(json!({ "email": "bob@example.com" }));
    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(bob.as_str())))
        .mount(&server)
        .await;

    h.service.login("bob@example.com", "secret").await.unwrap();

    assert_eq!(h.service.token(), Some(bob));
    assert_eq!(
        h.service.user().and_then(|u| u.email().map(String::from)),
        Some("bob@example.com".to_string())
    );
}

#[tokio::test]
async fn test_login_with_opaque_token_drops_previous_profile() {
    let server = MockServer::start().await;
    let h = harness(&server);

    h.service.set_token(&Token::from("tok-a")).unwrap();
    h.service
        .store()
        .set_user(&user(json!({ "email": "alice@example.com" })))
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok-bob")))
        .mount(&server)
        .await;

    h.service.login("bob@example.com", "secret").await.unwrap();

    assert_eq!(h.service.token(), Some(Token::from("tok-bob")));
    assert_eq!(h.service.user(), None);
    assert!(!h.service.is_authenticated());
}

#[tokio::test]
async fn test_login_failure_is_wrong_credentials() {
    let server = MockServer::start().await;
    let h = harness(&server);

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = h
        .service
        .login("user@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::WrongCredentials));
    assert_eq!(err.to_string(), "Wrong credentials");
    assert!(h.durable.is_empty());
    assert!(h.cookies.is_empty());
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_silent_login_validates_without_redirect() {
    let server = MockServer::start().await;
    let h = harness(&server);
    let token = unsigned_token(json!({ "email": "user@example.com" }));

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(201).set_body_string(token.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tokens"))
        .and(header("authorization", token.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = h
        .service
        .silent_login("user@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(credentials.token, token);
    assert_eq!(credentials.user.email(), Some("user@example.com"));
    assert!(h.service.is_authenticated());
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_silent_login_rejected_validation_clears() {
    let server = MockServer::start().await;
    let h = harness(&server);

    Mock::given(method("POST"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok-abc")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = h
        .service
        .silent_login("user@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthError::Rejected(RejectReason::ServerRejected { status: 401 })
    ));
    assert_cleared(&h);
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_logout_invalidates_clears_and_redirects() {
    let server = MockServer::start().await;
    let h = harness(&server);
    h.service.set_token(&Token::from("tok-1")).unwrap();
    h.service.set_brand(&BrandId::from("brand-1")).unwrap();

    Mock::given(method("DELETE"))
        .and(path("/tokens"))
        .and(header("authorization", "tok-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let navigation = h.service.logout().await;

    assert_eq!(
        navigation,
        Navigation::FullPage("http://localhost:3333/#/login".to_string())
    );
    assert_cleared(&h);
}

#[tokio::test]
async fn test_logout_survives_server_failure() {
    let server = MockServer::start().await;
    let h = harness(&server);
    h.service.set_token(&Token::from("tok-1")).unwrap();

    Mock::given(method("DELETE"))
        .and(path("/tokens"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    h.service.logout().await;

    assert_cleared(&h);
    assert_eq!(h.recorder.pages().len(), 1);
}

#[tokio::test]
async fn test_silent_logout_without_token_skips_request() {
    let server = MockServer::start().await;
    let h = harness(&server);

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    h.service.silent_logout().await;

    assert_cleared(&h);
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_internal_communication_routes_in_app() {
    let server = MockServer::start().await;
    let h = harness_with(
        AuthConfig::new("TESTING")
            .with_token_service(server.uri())
            .with_internal_communication(true),
    );

    let outcome = h.service.authenticate(Some("localhost/#/orders")).await;

    assert!(matches!(
        outcome,
        AuthOutcome::Redirected {
            navigation: Navigation::InApp(_),
            ..
        }
    ));
    assert_eq!(
        h.recorder.routes(),
        vec!["/login?redirect=localhost/#/orders".to_string()]
    );
    assert!(h.recorder.pages().is_empty());
}

#[tokio::test]
async fn test_redirect_to_home_if_authenticated() {
    let server = MockServer::start().await;
    let h = harness(&server);

    assert!(!h.service.redirect_to_home_if_authenticated());
    assert!(h.recorder.pages().is_empty());

    h.service.store().set_user(&user(json!({ "email": "x" }))).unwrap();

    assert!(h.service.redirect_to_home_if_authenticated());
    assert_eq!(h.recorder.pages(), vec!["http://localhost:3333/#/".to_string()]);
}

#[tokio::test]
async fn test_configure_environment_redirects_to_new_deployment() {
    let server = MockServer::start().await;
    let mut h = harness(&server);

    let env = h
        .service
        .configure_environment("STAGING", &EnvironmentOverrides::default().with_port(1));
    assert_eq!(env.solution_center_url(), "https://sc-stage.norris.zalan.do");

    let navigation = h.service.redirect(None);
    assert_eq!(
        navigation,
        Navigation::FullPage("https://sc-stage.norris.zalan.do/#/".to_string())
    );
}
