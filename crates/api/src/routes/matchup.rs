//! Route definitions for matchups, mounted at `/matchups`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::matchup;
use crate::state::AppState;

/// ```text
/// GET  /history                                    -> get_history
/// GET  /{matchup_id}                               -> get_matchup
/// POST /{matchup_id}/movies/{matchup_movie_id}/vote -> cast_vote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(matchup::get_history))
        .route("/{matchup_id}", get(matchup::get_matchup))
        .route(
            "/{matchup_id}/movies/{matchup_movie_id}/vote",
            post(matchup::cast_vote),
        )
}
