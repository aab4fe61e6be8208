pub mod admin;
pub mod matchup;
pub mod review;
pub mod stream;
