#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use cookie_api::auth::jwt::{generate_access_token, JwtConfig};
use cookie_api::config::ServerConfig;
use cookie_api::router::build_app_router;
use cookie_api::state::AppState;
use cookie_core::matchup::VotePolicy;
use cookie_core::types::DbId;
use cookie_db::models::movie::CreateMovie;
use cookie_db::models::user::CreateUser;
use cookie_db::repositories::{MovieRepo, UserRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "cookie-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        sse_subscriber_buffer: 16,
        sse_keep_alive_secs: 15,
        vote_policy: VotePolicy::AnyStatus,
        matchup_status_interval_secs: 60,
    }
}

/// Application state over `pool` with the test configuration.
pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
}

/// Full application router, with production middleware, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool))
}

/// Bearer token for `user_id` with `role`, signed with the test secret.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, nickname: &str, role: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            nickname: nickname.to_string(),
            profile_image: None,
            main_badge_image: Some(format!("{nickname}-badge.png")),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_movie(pool: &PgPool, title: &str) -> DbId {
    MovieRepo::create(
        pool,
        &CreateMovie {
            title: title.to_string(),
            poster: Some(format!("{title}.jpg")),
            score: 4.2,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a (finite) response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
