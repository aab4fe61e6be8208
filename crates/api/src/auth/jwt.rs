//! Verification of the session service's access tokens.
//!
//! Votes, reviews, and admin endpoints identify the caller by an HS256 JWT
//! carrying [`Claims`]. Tokens are minted by the session service with the
//! shared `JWT_SECRET`; [`generate_access_token`] exists for tooling and
//! tests.

use cookie_core::roles::{ROLE_ADMIN, ROLE_USER};
use cookie_core::types::DbId;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

/// Clock skew tolerated between the session service and this server.
const EXPIRY_LEEWAY_SECS: u64 = 30;

/// Roles a token may carry; anything else is rejected.
const KNOWN_ROLES: [&str; 2] = [ROLE_ADMIN, ROLE_USER];

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Voting user's id.
    pub sub: DbId,
    /// `"admin"` or `"user"`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15).
    ///
    /// # Panics
    ///
    /// Panics on a missing or empty secret or an unparsable expiry.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|v| {
                v.parse()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64")
            })
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = EXPIRY_LEEWAY_SECS;
        validation
    }
}

/// Sign an access token for `user_id` with `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, JwtError> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + config.access_token_expiry_mins * 60,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, expiry, and role, returning the token's [`Claims`].
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )?
    .claims;

    if !KNOWN_ROLES.contains(&claims.role.as_str()) {
        return Err(ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}
