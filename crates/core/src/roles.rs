//! Well-known role name constants.
//!
//! These must match the values allowed by the `users.role` check in
//! `20260301000001_create_users_and_movies.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
