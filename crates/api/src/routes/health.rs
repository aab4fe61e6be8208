use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
    stream_subscribers: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = cookie_db::health_check(&state.pool).await.is_ok();
    let stream_subscribers =
        state.review_feed.subscriber_count().await + state.push_feed.subscriber_count().await;

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        stream_subscribers,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
