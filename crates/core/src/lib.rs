//! Domain logic for the movie matchup and review backend.
//!
//! Nothing here touches the database or HTTP; persistence plugs in through
//! [`vote::VoteStore`].

pub mod error;
pub mod matchup;
pub mod memory_store;
pub mod points;
pub mod review;
pub mod roles;
pub mod types;
pub mod vote;
