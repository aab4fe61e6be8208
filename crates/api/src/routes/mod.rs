pub mod admin;
pub mod health;
pub mod matchup;
pub mod review;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /matchups/history                                      finished matchups (GET)
/// /matchups/{matchup_id}                                 detail with breakdowns (GET)
/// /matchups/{matchup_id}/movies/{matchup_movie_id}/vote  cast vote (POST, auth)
///
/// /reviews                                               create review (POST, auth)
/// /reviews/subscribe/feed                                review feed stream (SSE)
/// /reviews/subscribe/push-notification                   push stream (SSE)
///
/// /admin/matchups                                        create matchup (POST, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/matchups", matchup::router())
        .nest("/reviews", review::router())
        .nest("/admin", admin::router())
}
