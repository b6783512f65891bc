//! HTTP auth client tests against a throwaway upstream on localhost

#![cfg(feature = "server")]

mod common;

use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use casegate::{AuthBackend, AuthPayload, Credentials, Error, HttpAuthBackend};
use common::*;
use serde_json::{json, Value};

async fn upstream_login(Json(body): Json<Value>) -> Result<Json<AuthPayload>, (StatusCode, Json<Value>)> {
    match body["username"].as_str() {
        Some("crash") => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })))),
        Some("sam") if body["password"] == "mas" => Ok(Json(AuthPayload {
            token: "good".into(),
            user: user("sam", vec![analyst(), supervisor()]),
        })),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid credentials" })))),
    }
}

async fn upstream_verify(headers: HeaderMap) -> Result<Json<AuthPayload>, StatusCode> {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer good") => Ok(Json(AuthPayload { token: "good".into(), user: user("sam", vec![analyst()]) })),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn upstream_logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(upstream_login))
        .route("/api/auth/verify", get(upstream_verify))
        .route("/api/auth/logout", post(upstream_logout));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/")
}

async fn client() -> HttpAuthBackend {
    HttpAuthBackend::new(spawn_upstream().await, Duration::from_secs(5)).unwrap()
}

#[test]
fn trailing_slash_is_trimmed() {
    let c = HttpAuthBackend::new("http://auth.local/api/", Duration::from_secs(1)).unwrap();
    assert_eq!(c.base_url(), "http://auth.local/api");
}

#[tokio::test]
async fn login_parses_payload() {
    let c = client().await;
    let payload = c.login(&Credentials::new("sam", "mas")).await.unwrap();
    assert_eq!(payload.token, "good");
    assert_eq!(payload.user.roles().len(), 2);
}

#[tokio::test]
async fn unauthorized_maps_to_session_expired() {
    let c = client().await;
    assert_eq!(c.login(&Credentials::new("sam", "nope")).await.unwrap_err(), Error::SessionExpired);
    assert_eq!(c.verify("bad").await.unwrap_err(), Error::SessionExpired);
}

#[tokio::test]
async fn server_errors_carry_status_and_message() {
    let c = client().await;
    let err = c.login(&Credentials::new("crash", "x")).await.unwrap_err();
    assert_eq!(err, Error::Upstream { status: 500, message: "boom".into() });
}

#[tokio::test]
async fn verify_and_logout_send_bearer() {
    let c = client().await;
    assert_eq!(c.verify("good").await.unwrap().user.username, "sam");
    c.logout("good").await.unwrap();
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let c = HttpAuthBackend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    assert!(matches!(c.verify("good").await, Err(Error::Transport(_))));
}

#[test]
fn missing_auth_url_is_a_config_error() {
    let err = HttpAuthBackend::from_config(&casegate::Config::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
