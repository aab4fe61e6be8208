//! Admin-only handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use cookie_core::error::CoreError;
use cookie_core::matchup::{validate_new_matchup, Matchup, MatchupStatus, NewMatchup};
use cookie_db::repositories::{MatchupRepo, MovieRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/matchups
///
/// Create a matchup between two catalog movies. Both entries start with
/// zeroed score sets; the initial status follows from the time window.
pub async fn create_matchup(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<NewMatchup>,
) -> AppResult<impl IntoResponse> {
    validate_new_matchup(&input).map_err(AppError::BadRequest)?;

    for side in [&input.movie1, &input.movie2] {
        if MovieRepo::find_by_id(&state.pool, side.movie_id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Movie",
                id: side.movie_id,
            }));
        }
    }

    let status = MatchupStatus::status_for(input.start_at, input.end_at, Utc::now());
    let row = MatchupRepo::create(&state.pool, &input, status).await?;
    let matchup = Matchup::try_from(row)?;

    tracing::info!(
        matchup_id = matchup.id,
        status = %matchup.status,
        user_id = admin.user_id,
        "Matchup created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: matchup })))
}
