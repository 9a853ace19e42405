//! Tests for the authorization middleware

use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use super::authenticator::{AuthFailure, AuthUser, Authenticator};
use super::jwt::{ClaimSet, TokenCodec};
use super::middleware::*;
use super::store::InMemoryCredentialStore;

const SECRET: &str = "middleware-test-secret-at-least-32-chars";

fn authenticator() -> Arc<Authenticator> {
    static AUTH: OnceLock<Arc<Authenticator>> = OnceLock::new();
    AUTH.get_or_init(|| {
        Arc::new(
            Authenticator::new(
                Arc::new(InMemoryCredentialStore::default()),
                TokenCodec::new(SECRET),
                Duration::minutes(30),
            )
            .unwrap(),
        )
    })
    .clone()
}

fn auth_state() -> AuthState {
    AuthState::new(authenticator(), "Viewer")
}

fn token_for(username: &str, role: &str) -> String {
    TokenCodec::new(SECRET)
        .encode(
            &ClaimSet {
                username: username.to_string(),
                role: role.to_string(),
                hashed_secret: "$argon2id$placeholder".to_string(),
            },
            Duration::minutes(30),
        )
        .unwrap()
}

fn expired_token() -> String {
    TokenCodec::new(SECRET)
        .encode_at(
            &ClaimSet {
                username: "tim".to_string(),
                role: "Viewer".to_string(),
                hashed_secret: "$argon2id$placeholder".to_string(),
            },
            Duration::minutes(30),
            OffsetDateTime::now_utc() - Duration::hours(2),
        )
        .unwrap()
}

async fn whoami(user: AuthUser) -> String {
    user.username
}

fn app() -> Router {
    Router::new()
        .route(
            "/items",
            get(|| async { "listed" })
                .post(whoami)
                .put(whoami)
                .delete(whoami)
                .options(|| async { StatusCode::NO_CONTENT }),
        )
        .route(TOKEN_ISSUANCE_PATH, post(|| async { "issued" }))
        .layer(middleware::from_fn_with_state(auth_state(), require_auth))
}

async fn send(method: Method, uri: &str, authorization: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }

    app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_message(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice::<String>(&bytes).expect("body should be a JSON string")
}

#[tokio::test]
async fn get_without_header_is_allowed() {
    let response = send(Method::GET, "/items", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "listed");
}

#[tokio::test]
async fn options_without_header_is_allowed() {
    let response = send(Method::OPTIONS, "/items", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn get_with_garbage_token_is_still_allowed() {
    let response = send(Method::GET, "/items", Some("Bearer garbage")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn post_without_header_is_rejected() {
    let response = send(Method::POST, "/items", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_message(response).await, MISSING_TOKEN_MESSAGE);
}

#[tokio::test]
async fn put_without_header_is_rejected() {
    let response = send(Method::PUT, "/items", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_message(response).await, "Missing authentication token.");
}

#[tokio::test]
async fn empty_bearer_counts_as_missing() {
    let response = send(Method::POST, "/items", Some("Bearer ")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_message(response).await, MISSING_TOKEN_MESSAGE);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let header = format!("Bearer {}", expired_token());
    let response = send(Method::POST, "/items", Some(&header)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_message(response).await, "Invalid authentication token.");
}

#[tokio::test]
async fn valid_token_reaches_handler_with_identity() {
    let header = format!("Bearer {}", token_for("tim", "Viewer"));
    let response = send(Method::POST, "/items", Some(&header)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "tim");
}

#[tokio::test]
async fn token_without_bearer_prefix_is_accepted() {
    let token = token_for("tim", "Viewer");
    let response = send(Method::DELETE, "/items", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_role_is_rejected() {
    let header = format!("Bearer {}", token_for("tim", "Editor"));
    let response = send(Method::POST, "/items", Some(&header)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_message(response).await, INVALID_TOKEN_MESSAGE);
}

#[tokio::test]
async fn foreign_token_is_rejected() {
    let foreign = TokenCodec::new("a-completely-different-secret-value!!")
        .encode(
            &ClaimSet {
                username: "tim".to_string(),
                role: "Viewer".to_string(),
                hashed_secret: String::new(),
            },
            Duration::minutes(30),
        )
        .unwrap();
    let header = format!("Bearer {foreign}");
    let response = send(Method::PUT, "/items", Some(&header)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_message(response).await, INVALID_TOKEN_MESSAGE);
}

#[tokio::test]
async fn issuance_path_needs_no_token() {
    let response = send(Method::POST, TOKEN_ISSUANCE_PATH, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "issued");
}

#[test]
fn decision_records_failure_kind() {
    let state = auth_state();
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", expired_token())).unwrap(),
    );

    let decision = authorize(&state, &Method::POST, "/items", &headers).unwrap();
    assert_eq!(
        decision,
        AuthDecision::Rejected(Rejection::InvalidToken(AuthFailure::Expired))
    );

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token_for("tim", "Admin"))).unwrap(),
    );
    let decision = authorize(&state, &Method::PATCH, "/items", &headers).unwrap();
    assert_eq!(
        decision,
        AuthDecision::Rejected(Rejection::InvalidToken(AuthFailure::InsufficientRole))
    );
}

#[test]
fn decision_allows_required_role() {
    let state = auth_state();
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token_for("tim", "Viewer"))).unwrap(),
    );

    let decision = authorize(&state, &Method::POST, "/v1/from_query", &headers).unwrap();
    assert_eq!(
        decision,
        AuthDecision::Allowed(AuthUser {
            username: "tim".to_string(),
            role: "Viewer".to_string(),
        })
    );
}

#[test]
fn exemptions() {
    assert!(is_exempt(&Method::GET, "/anything"));
    assert!(is_exempt(&Method::OPTIONS, "/anything"));
    assert!(is_exempt(&Method::POST, TOKEN_ISSUANCE_PATH));
    assert!(!is_exempt(&Method::POST, "/anything"));
    assert!(!is_exempt(&Method::HEAD, "/anything"));
    assert!(!is_exempt(&Method::PUT, "/login_for_access_token/extra"));
}

#[test]
fn bearer_extraction() {
    let mut headers = HeaderMap::new();
    assert_eq!(extract_bearer(&headers), Ok(None));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
    assert_eq!(extract_bearer(&headers), Ok(Some("abc.def.ghi")));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
    assert_eq!(extract_bearer(&headers), Ok(Some("abc.def.ghi")));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert_eq!(extract_bearer(&headers), Ok(None));
}
