//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod matchup_repo;
pub mod movie_repo;
pub mod participation_repo;
pub mod review_repo;
pub mod user_repo;

pub use matchup_repo::MatchupRepo;
pub use movie_repo::MovieRepo;
pub use participation_repo::ParticipationRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
