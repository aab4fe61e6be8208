//! PostgreSQL implementation of the tally engine's [`VoteStore`].

use cookie_core::error::CoreError;
use cookie_core::matchup::{Matchup, MatchupMovie, MatchupStatus, Participation};
use cookie_core::types::DbId;
use cookie_core::vote::{VoteCommit, VoteStore};

use crate::repositories::{MatchupRepo, ParticipationRepo, UserRepo};
use crate::DbPool;

/// Constraint guarding one participation per user per matchup.
const PARTICIPATION_CONSTRAINT: &str = "uq_matchup_participations_user_matchup";

/// SQLSTATE `numeric_value_out_of_range`.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// [`VoteStore`] backed by the repositories in this crate.
#[derive(Clone)]
pub struct PgVoteStore {
    pool: DbPool,
}

impl PgVoteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a storage failure into a sanitized domain error.
fn store_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Vote store query failed");
    CoreError::Internal(format!("database error: {err}"))
}

impl VoteStore for PgVoteStore {
    async fn find_matchup(&self, matchup_id: DbId) -> Result<Option<Matchup>, CoreError> {
        MatchupRepo::find_by_id(&self.pool, matchup_id)
            .await
            .map_err(store_error)?
            .map(Matchup::try_from)
            .transpose()
    }

    async fn user_exists(&self, user_id: DbId) -> Result<bool, CoreError> {
        UserRepo::exists(&self.pool, user_id)
            .await
            .map_err(store_error)
    }

    async fn find_matchup_movie(
        &self,
        matchup_movie_id: DbId,
    ) -> Result<Option<MatchupMovie>, CoreError> {
        let row = MatchupRepo::find_movie(&self.pool, matchup_movie_id)
            .await
            .map_err(store_error)?;
        Ok(row.map(MatchupMovie::from))
    }

    async fn has_participated(&self, user_id: DbId, matchup_id: DbId) -> Result<bool, CoreError> {
        ParticipationRepo::exists_for_matchup(&self.pool, user_id, matchup_id)
            .await
            .map_err(store_error)
    }

    async fn commit_vote(&self, vote: &VoteCommit) -> Result<Participation, CoreError> {
        let duplicate = || CoreError::DuplicateParticipation {
            user_id: vote.user_id,
            matchup_id: vote.matchup_id,
        };

        match ParticipationRepo::commit_vote(&self.pool, vote).await {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(duplicate()),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(PARTICIPATION_CONSTRAINT) =>
            {
                Err(duplicate())
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) =>
            {
                tracing::debug!(
                    matchup_movie_id = vote.matchup_movie_id,
                    "Rejected vote overflowing a point total"
                );
                Err(CoreError::Validation(
                    "Point total would overflow".to_string(),
                ))
            }
            Err(err) => Err(store_error(err)),
        }
    }

    async fn list_matchups_by_status(
        &self,
        status: MatchupStatus,
    ) -> Result<Vec<Matchup>, CoreError> {
        MatchupRepo::list_by_status(&self.pool, status)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(Matchup::try_from)
            .collect()
    }
}
