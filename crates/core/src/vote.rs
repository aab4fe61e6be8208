//! Matchup vote tally engine.
//!
//! [`VoteTallyEngine`] validates a vote, enforces one participation per
//! user per matchup, and hands the point/participation/counter update to a
//! [`VoteStore`] as a single atomic commit. The participation check and the
//! commit run under a per-matchup lock so concurrent votes for the same
//! matchup execute one at a time; votes for different matchups never share
//! a lock.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tokio::sync::OwnedMutexGuard;

use crate::error::CoreError;
use crate::matchup::{
    Matchup, MatchupDetail, MatchupHistoryItem, MatchupMovie, MatchupStatus, Participation,
    VotePolicy,
};
use crate::points::{CharmPoints, EmotionPoints, ScoreSet};
use crate::types::DbId;

/// Idle lock entries are pruned once the map grows past this size.
const LOCK_PRUNE_THRESHOLD: usize = 1024;

// ---------------------------------------------------------------------------
// Vote payload
// ---------------------------------------------------------------------------

/// Request body for a matchup vote.
///
/// Either block may be omitted; an omitted block leaves that score set
/// untouched. Axes missing inside a block count as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VotePayload {
    pub charm_point: Option<CharmPoints>,
    pub emotion_point: Option<EmotionPoints>,
}

impl VotePayload {
    /// Reject negative or oversized deltas before any state is touched.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(charm) = &self.charm_point {
            charm.validate_delta()?;
        }
        if let Some(emotion) = &self.emotion_point {
            emotion.validate_delta()?;
        }
        Ok(())
    }
}

/// Everything a store needs to commit one accepted vote.
#[derive(Debug, Clone)]
pub struct VoteCommit {
    pub user_id: DbId,
    pub matchup_id: DbId,
    pub matchup_movie_id: DbId,
    pub charm: Option<CharmPoints>,
    pub emotion: Option<EmotionPoints>,
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence operations the tally engine depends on.
pub trait VoteStore: Send + Sync {
    fn find_matchup(
        &self,
        matchup_id: DbId,
    ) -> impl Future<Output = Result<Option<Matchup>, CoreError>> + Send;

    fn user_exists(&self, user_id: DbId) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn find_matchup_movie(
        &self,
        matchup_movie_id: DbId,
    ) -> impl Future<Output = Result<Option<MatchupMovie>, CoreError>> + Send;

    /// Whether the user holds a participation on either entry of the matchup.
    fn has_participated(
        &self,
        user_id: DbId,
        matchup_id: DbId,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    /// Apply the deltas, record the participation, and bump the vote count
    /// as one unit. Fails with [`CoreError::DuplicateParticipation`] (and
    /// changes nothing) if the user already participated in the matchup.
    fn commit_vote(
        &self,
        vote: &VoteCommit,
    ) -> impl Future<Output = Result<Participation, CoreError>> + Send;

    fn list_matchups_by_status(
        &self,
        status: MatchupStatus,
    ) -> impl Future<Output = Result<Vec<Matchup>, CoreError>> + Send;
}

// ---------------------------------------------------------------------------
// Per-matchup locks
// ---------------------------------------------------------------------------

/// Lazily created async mutex per matchup id.
#[derive(Default)]
pub struct MatchupLocks {
    locks: Mutex<HashMap<DbId, Arc<tokio::sync::Mutex<()>>>>,
}

impl MatchupLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `matchup_id`.
    pub async fn acquire(&self, matchup_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            if locks.len() >= LOCK_PRUNE_THRESHOLD {
                // Only the map holds idle entries.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(locks.entry(matchup_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of matchups with a lock entry.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Orchestrates vote casting and matchup read models over a [`VoteStore`].
pub struct VoteTallyEngine<S> {
    store: S,
    policy: VotePolicy,
    locks: MatchupLocks,
}

impl<S: VoteStore> VoteTallyEngine<S> {
    pub fn new(store: S, policy: VotePolicy) -> Self {
        Self {
            store,
            policy,
            locks: MatchupLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cast `user_id`'s single vote in `matchup_id` for `matchup_movie_id`.
    ///
    /// Either every effect of the vote is committed or none is. A failed
    /// cast is final; the engine never retries.
    pub async fn cast_vote(
        &self,
        user_id: DbId,
        matchup_id: DbId,
        matchup_movie_id: DbId,
        payload: &VotePayload,
    ) -> Result<Participation, CoreError> {
        payload.validate()?;

        let matchup = self
            .store
            .find_matchup(matchup_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Matchup",
                id: matchup_id,
            })?;

        if !self.store.user_exists(user_id).await? {
            return Err(CoreError::NotFound {
                entity: "User",
                id: user_id,
            });
        }

        let movie = self
            .store
            .find_matchup_movie(matchup_movie_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MatchupMovie",
                id: matchup_movie_id,
            })?;

        if movie.matchup_id != matchup.id || !matchup.contains(movie.id) {
            return Err(CoreError::InvalidReference {
                matchup_movie_id,
                matchup_id,
            });
        }

        self.policy.check(&matchup)?;

        let _guard = self.locks.acquire(matchup_id).await;

        if self.store.has_participated(user_id, matchup_id).await? {
            tracing::debug!(user_id, matchup_id, "Rejected repeat matchup vote");
            return Err(CoreError::DuplicateParticipation {
                user_id,
                matchup_id,
            });
        }

        let participation = self
            .store
            .commit_vote(&VoteCommit {
                user_id,
                matchup_id,
                matchup_movie_id,
                charm: payload.charm_point,
                emotion: payload.emotion_point,
            })
            .await?;

        tracing::info!(
            user_id,
            matchup_id,
            matchup_movie_id,
            participation_id = participation.id,
            "Matchup vote recorded"
        );

        Ok(participation)
    }

    /// Both entries of a matchup with freshly computed percentages.
    pub async fn matchup_detail(&self, matchup_id: DbId) -> Result<MatchupDetail, CoreError> {
        let matchup = self
            .store
            .find_matchup(matchup_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Matchup",
                id: matchup_id,
            })?;

        let [movie1_id, movie2_id] = matchup.movie_ids;
        let movie1 = self.require_movie(movie1_id).await?;
        let movie2 = self.require_movie(movie2_id).await?;

        Ok(MatchupDetail::new(&matchup, &movie1, &movie2))
    }

    /// Finished matchups, summary fields only.
    pub async fn matchup_history(&self) -> Result<Vec<MatchupHistoryItem>, CoreError> {
        let expired = self
            .store
            .list_matchups_by_status(MatchupStatus::Expired)
            .await?;
        Ok(expired.iter().map(MatchupHistoryItem::from).collect())
    }

    async fn require_movie(&self, matchup_movie_id: DbId) -> Result<MatchupMovie, CoreError> {
        self.store
            .find_matchup_movie(matchup_movie_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MatchupMovie",
                id: matchup_movie_id,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
