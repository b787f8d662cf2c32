//! Integration tests for the login / refresh / logout flow

use std::sync::Arc;

use actix_web::{
    cookie::Cookie,
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web,
};
use async_trait::async_trait;
use serde_json::{json, Value};

use auth_api::{create_app, AppState};
use auth_core::domain::entities::session::RefreshSession;
use auth_core::errors::DomainError;
use auth_core::repositories::{InMemorySessionStore, RefreshSessionStore};
use auth_core::services::{build_signer, AuthSessionConfig, AuthSessionService, KeySetPublisher};
use auth_core::testutil::{rsa_signer_config, ManualClock};
use auth_infra::InMemoryMemberRepository;
use auth_shared::config::CorsConfig;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct horse battery";

/// Session store whose revocations always fail, as when the backend is down
struct RevokeFailsStore(InMemorySessionStore);

#[async_trait]
impl RefreshSessionStore for RevokeFailsStore {
    async fn create_session(&self, id: &str, session: RefreshSession) -> Result<(), DomainError> {
        self.0.create_session(id, session).await
    }

    async fn get_session(&self, id: &str) -> Result<RefreshSession, DomainError> {
        self.0.get_session(id).await
    }

    async fn revoke(&self, _id: &str) -> Result<(), DomainError> {
        Err(DomainError::internal("session store unavailable"))
    }

    async fn consume(&self, id: &str) -> Result<RefreshSession, DomainError> {
        self.0.consume(id).await
    }

    async fn purge_expired(&self, retention: chrono::Duration) -> Result<usize, DomainError> {
        self.0.purge_expired(retention).await
    }
}

fn test_state() -> web::Data<AppState> {
    let clock = ManualClock::fixed();
    state_with_sessions(Arc::new(InMemorySessionStore::new(clock.clone())), clock)
}

fn state_with_sessions(
    sessions: Arc<dyn RefreshSessionStore>,
    clock: Arc<ManualClock>,
) -> web::Data<AppState> {
    let signer = build_signer(rsa_signer_config(), clock.clone()).unwrap();
    let members = Arc::new(InMemoryMemberRepository::with_cost(4, clock.clone()));

    let auth_service = AuthSessionService::new(
        members.clone(),
        sessions,
        signer.clone(),
        clock,
        AuthSessionConfig::default(),
    );

    web::Data::new(AppState {
        auth_service: Arc::new(auth_service),
        members,
        key_set: Arc::new(KeySetPublisher::new(signer)),
        cookie_secure: true,
        jwks_path: "/.well-known/jwks.json".to_string(),
    })
}

fn refresh_cookie_of<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == "refresh_token")
        .map(|cookie| cookie.into_owned())
}

macro_rules! register_and_login {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/v1/auth/register")
            .set_json(json!({ "email": EMAIL, "password": PASSWORD, "name": "Ada" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/v1/auth/login")
            .insert_header((header::USER_AGENT, "integration-test"))
            .set_json(json!({ "email": EMAIL, "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = refresh_cookie_of(&resp).expect("login sets the refresh cookie");
        let body: Value = test::read_body_json(resp).await;
        (cookie, body)
    }};
}

#[actix_web::test]
async fn test_login_issues_token_and_scoped_cookie() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;

    let (cookie, body) = register_and_login!(app);

    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["access_token"].as_str().unwrap().split('.').count(), 3);

    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.path(), Some("/v1/auth/refresh"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::seconds(604800))
    );
}

#[actix_web::test]
async fn test_login_with_wrong_password_is_generic_401() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;
    register_and_login!(app);

    let wrong_password = test::TestRequest::post()
        .uri("/v1/auth/login")
        .set_json(json!({ "email": EMAIL, "password": "not the password" }))
        .to_request();
    let resp = test::call_service(&app, wrong_password).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password_body: Value = test::read_body_json(resp).await;

    let unknown_member = test::TestRequest::post()
        .uri("/v1/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, unknown_member).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_member_body: Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password_body["error"], "invalid_credentials");
    assert_eq!(wrong_password_body["error"], unknown_member_body["error"]);
    assert_eq!(wrong_password_body["message"], unknown_member_body["message"]);
}

#[actix_web::test]
async fn test_refresh_rotates_and_old_cookie_dies() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;
    let (first, _) = register_and_login!(app);

    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .cookie(first.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second = refresh_cookie_of(&resp).expect("refresh sets a new cookie");
    assert_ne!(second.value(), first.value());

    let replay = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .cookie(first)
        .to_request();
    let resp = test::call_service(&app, replay).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "session_invalid");

    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .cookie(second)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post().uri("/v1/auth/refresh").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_revokes_session_and_clears_cookie() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;
    let (cookie, _) = register_and_login!(app);

    let req = test::TestRequest::delete()
        .uri("/v1/auth/refresh")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cleared = refresh_cookie_of(&resp).expect("logout clears the cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(
        cleared.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );

    let req = test::TestRequest::post()
        .uri("/v1/auth/refresh")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_logout_with_unknown_or_missing_cookie_succeeds() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::delete()
        .uri("/v1/auth/refresh")
        .cookie(Cookie::new("refresh_token", "never-issued"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::delete().uri("/v1/auth/refresh").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[actix_web::test]
async fn test_logout_succeeds_when_store_cannot_revoke() {
    let clock = ManualClock::fixed();
    let sessions = Arc::new(RevokeFailsStore(InMemorySessionStore::new(clock.clone())));
    let app = test::init_service(create_app(
        state_with_sessions(sessions, clock),
        &CorsConfig::default(),
    ))
    .await;
    let (cookie, _) = register_and_login!(app);

    let req = test::TestRequest::delete()
        .uri("/v1/auth/refresh")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cleared = refresh_cookie_of(&resp).expect("logout clears the cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn test_register_duplicate_is_conflict() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;
    register_and_login!(app);

    let req = test::TestRequest::post()
        .uri("/v1/auth/register")
        .set_json(json!({ "email": "ADA@example.com", "password": PASSWORD, "name": "Ada" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_register_validates_body() {
    let app = test::init_service(create_app(test_state(), &CorsConfig::default())).await;

    let req = test::TestRequest::post()
        .uri("/v1/auth/register")
        .set_json(json!({ "email": "not-an-email", "password": "short", "name": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");

    let req = test::TestRequest::post()
        .uri("/v1/auth/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
