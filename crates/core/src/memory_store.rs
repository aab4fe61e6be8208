//! In-process [`VoteStore`] backed by a single mutex-guarded state.
//!
//! Used by engine tests and by callers that want the tally engine without
//! a database. All mutation for one commit happens under one lock
//! acquisition, which makes [`VoteStore::commit_vote`] atomic.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::error::CoreError;
use crate::matchup::{Matchup, MatchupMovie, MatchupStatus, NewMatchup, Participation};
use crate::points::ScoreSet;
use crate::types::DbId;
use crate::vote::{VoteCommit, VoteStore};

#[derive(Default)]
struct MemoryState {
    next_id: DbId,
    users: HashSet<DbId>,
    matchups: HashMap<DbId, Matchup>,
    movies: HashMap<DbId, MatchupMovie>,
    participations: Vec<Participation>,
}

impl MemoryState {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn has_participated(&self, user_id: DbId, matchup_id: DbId) -> bool {
        let Some(matchup) = self.matchups.get(&matchup_id) else {
            return false;
        };
        self.participations
            .iter()
            .any(|p| p.user_id == user_id && matchup.contains(p.matchup_movie_id))
    }
}

/// Thread-safe in-memory matchup storage.
#[derive(Default)]
pub struct InMemoryVoteStore {
    state: Mutex<MemoryState>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a user id as existing.
    pub fn add_user(&self, user_id: DbId) {
        self.state().users.insert(user_id);
    }

    /// Create a matchup and its two zero-scored entries.
    ///
    /// The initial status is derived from the matchup window.
    pub fn create_matchup(&self, input: &NewMatchup) -> Matchup {
        let mut state = self.state();
        let matchup_id = state.next_id();

        let mut movie_ids = [0; 2];
        for (slot, side) in [&input.movie1, &input.movie2].into_iter().enumerate() {
            let id = state.next_id();
            movie_ids[slot] = id;
            state.movies.insert(
                id,
                MatchupMovie {
                    id,
                    matchup_id,
                    movie_id: side.movie_id,
                    movie_title: side.movie_title.clone(),
                    movie_poster: side.movie_poster.clone(),
                    vote_count: 0,
                    charm: Default::default(),
                    emotion: Default::default(),
                },
            );
        }

        let matchup = Matchup {
            id: matchup_id,
            title: input.title.clone(),
            matchup_type: input.matchup_type.clone(),
            start_at: input.start_at,
            end_at: input.end_at,
            status: MatchupStatus::status_for(input.start_at, input.end_at, Utc::now()),
            movie_ids,
        };
        state.matchups.insert(matchup_id, matchup.clone());
        matchup
    }

    /// Force a matchup's status. Returns `false` if the matchup is unknown
    /// or the step would move backwards.
    pub fn set_status(&self, matchup_id: DbId, status: MatchupStatus) -> bool {
        let mut state = self.state();
        match state.matchups.get_mut(&matchup_id) {
            Some(matchup) if matchup.status.can_transition_to(status) => {
                matchup.status = status;
                true
            }
            _ => false,
        }
    }

    /// Snapshot of one matchup movie.
    pub fn matchup_movie(&self, matchup_movie_id: DbId) -> Option<MatchupMovie> {
        self.state().movies.get(&matchup_movie_id).cloned()
    }

    /// Total participations recorded across all matchups.
    pub fn participation_count(&self) -> usize {
        self.state().participations.len()
    }
}

impl VoteStore for InMemoryVoteStore {
    async fn find_matchup(&self, matchup_id: DbId) -> Result<Option<Matchup>, CoreError> {
        Ok(self.state().matchups.get(&matchup_id).cloned())
    }

    async fn user_exists(&self, user_id: DbId) -> Result<bool, CoreError> {
        Ok(self.state().users.contains(&user_id))
    }

    async fn find_matchup_movie(
        &self,
        matchup_movie_id: DbId,
    ) -> Result<Option<MatchupMovie>, CoreError> {
        Ok(self.matchup_movie(matchup_movie_id))
    }

    async fn has_participated(&self, user_id: DbId, matchup_id: DbId) -> Result<bool, CoreError> {
        Ok(self.state().has_participated(user_id, matchup_id))
    }

    async fn commit_vote(&self, vote: &VoteCommit) -> Result<Participation, CoreError> {
        let mut state = self.state();

        if state.has_participated(vote.user_id, vote.matchup_id) {
            return Err(CoreError::DuplicateParticipation {
                user_id: vote.user_id,
                matchup_id: vote.matchup_id,
            });
        }

        let id = state.next_id();
        let movie = state
            .movies
            .get_mut(&vote.matchup_movie_id)
            .ok_or(CoreError::NotFound {
                entity: "MatchupMovie",
                id: vote.matchup_movie_id,
            })?;

        let mut charm = movie.charm;
        let mut emotion = movie.emotion;
        if let Some(delta) = &vote.charm {
            charm.apply_delta(delta)?;
        }
        if let Some(delta) = &vote.emotion {
            emotion.apply_delta(delta)?;
        }
        movie.charm = charm;
        movie.emotion = emotion;
        movie.vote_count += 1;

        let participation = Participation {
            id,
            user_id: vote.user_id,
            matchup_id: vote.matchup_id,
            matchup_movie_id: vote.matchup_movie_id,
            created_at: Utc::now(),
        };
        state.participations.push(participation.clone());
        Ok(participation)
    }

    async fn list_matchups_by_status(
        &self,
        status: MatchupStatus,
    ) -> Result<Vec<Matchup>, CoreError> {
        let mut matchups: Vec<Matchup> = self
            .state()
            .matchups
            .values()
            .filter(|m| m.status == status)
            .cloned()
            .collect();
        matchups.sort_by(|a, b| b.end_at.cmp(&a.end_at).then(b.id.cmp(&a.id)));
        Ok(matchups)
    }
}
