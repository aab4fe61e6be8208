//! Handlers for matchup reads and voting.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cookie_core::types::DbId;
use cookie_core::vote::VotePayload;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/matchups/history
///
/// Finished matchups, most recently ended first.
pub async fn get_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let history = state.votes.matchup_history().await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/matchups/{matchup_id}
pub async fn get_matchup(
    State(state): State<AppState>,
    Path(matchup_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = state.votes.matchup_detail(matchup_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/matchups/{matchup_id}/movies/{matchup_movie_id}/vote
///
/// Spend the caller's one vote in the matchup on `matchup_movie_id`,
/// adding the supplied charm and emotion points to that entry.
pub async fn cast_vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((matchup_id, matchup_movie_id)): Path<(DbId, DbId)>,
    Json(payload): Json<VotePayload>,
) -> AppResult<impl IntoResponse> {
    let participation = state
        .votes
        .cast_vote(auth.user_id, matchup_id, matchup_movie_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: participation,
        }),
    ))
}
