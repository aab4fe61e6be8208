//! Route definitions for reviews, mounted at `/reviews`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{review, stream};
use crate::state::AppState;

/// ```text
/// POST /                           -> create_review
/// GET  /subscribe/feed             -> review_feed (SSE)
/// GET  /subscribe/push-notification -> push_notifications (SSE)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(review::create_review))
        .route("/subscribe/feed", get(stream::review_feed))
        .route(
            "/subscribe/push-notification",
            get(stream::push_notifications),
        )
}
