//! Integration tests for key discovery, health and common response headers

use std::sync::Arc;

use actix_web::{
    http::{header, StatusCode},
    test, web,
};
use serde_json::Value;

use auth_api::{create_app, AppState};
use auth_core::repositories::InMemorySessionStore;
use auth_core::services::{
    build_signer, AuthSessionConfig, AuthSessionService, KeySetPublisher, TokenSignerConfig,
};
use auth_core::testutil::{
    hmac_signer_config, rsa_signer_config, ManualClock, RSA_EXPONENT_B64, RSA_MODULUS_B64,
    TEST_KEY_ID,
};
use auth_infra::InMemoryMemberRepository;
use auth_shared::config::CorsConfig;

const JWKS_PATH: &str = "/.well-known/jwks.json";

fn state_with(signer_config: TokenSignerConfig) -> web::Data<AppState> {
    let clock = ManualClock::fixed();
    let signer = build_signer(signer_config, clock.clone()).unwrap();
    let members = Arc::new(InMemoryMemberRepository::with_cost(4, clock.clone()));
    let auth_service = AuthSessionService::new(
        members.clone(),
        Arc::new(InMemorySessionStore::new(clock.clone())),
        signer.clone(),
        clock,
        AuthSessionConfig::default(),
    );

    web::Data::new(AppState {
        auth_service: Arc::new(auth_service),
        members,
        key_set: Arc::new(KeySetPublisher::new(signer)),
        cookie_secure: true,
        jwks_path: JWKS_PATH.to_string(),
    })
}

#[actix_web::test]
async fn test_jwks_publishes_rsa_key() {
    let app = test::init_service(create_app(
        state_with(rsa_signer_config()),
        &CorsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri(JWKS_PATH).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=300"
    );

    let body: Value = test::read_body_json(resp).await;
    let keys = body["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["kty"], "RSA");
    assert_eq!(keys[0]["use"], "sig");
    assert_eq!(keys[0]["alg"], "RS256");
    assert_eq!(keys[0]["kid"], TEST_KEY_ID);
    assert_eq!(keys[0]["n"], RSA_MODULUS_B64);
    assert_eq!(keys[0]["e"], RSA_EXPONENT_B64);
}

#[actix_web::test]
async fn test_jwks_is_empty_for_shared_secret_signer() {
    let app = test::init_service(create_app(
        state_with(hmac_signer_config()),
        &CorsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri(JWKS_PATH).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["keys"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(
        state_with(rsa_signer_config()),
        &CorsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_every_response_carries_version_header() {
    let app = test::init_service(create_app(
        state_with(rsa_signer_config()),
        &CorsConfig::default(),
    ))
    .await;

    for uri in ["/health", JWKS_PATH, "/v1/nothing-here"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get("x-version-id").unwrap(),
            "v1",
            "missing version header on {}",
            uri
        );
    }
}

#[actix_web::test]
async fn test_unknown_route_is_json_404() {
    let app = test::init_service(create_app(
        state_with(rsa_signer_config()),
        &CorsConfig::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/v1/nothing-here").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}
