//! Admin routes, mounted at `/admin`.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// POST /matchups -> create_matchup (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/matchups", post(admin::create_matchup))
}
