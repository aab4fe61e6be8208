use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A matchup movie was addressed through a matchup it does not belong to.
    #[error("Matchup movie {matchup_movie_id} does not belong to matchup {matchup_id}")]
    InvalidReference {
        matchup_movie_id: DbId,
        matchup_id: DbId,
    },

    /// The user already holds a participation in this matchup (either side).
    #[error("User {user_id} has already voted in matchup {matchup_id}")]
    DuplicateParticipation { user_id: DbId, matchup_id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
