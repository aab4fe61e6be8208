use cookie_core::matchup::VotePolicy;
use cookie_events::DEFAULT_SUBSCRIBER_BUFFER;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Budget for draining background tasks on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Queue bound for each streaming subscriber (default: `64`).
    pub sse_subscriber_buffer: usize,
    /// Interval between SSE keep-alive comments (default: `15`).
    pub sse_keep_alive_secs: u64,
    /// Which matchup statuses accept votes (default: `any_status`).
    pub vote_policy: VotePolicy,
    /// Tick of the matchup status advancer in seconds (default: `60`).
    pub matchup_status_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `HOST`                         | `0.0.0.0`               |
    /// | `PORT`                         | `3000`                  |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`        | `30`                    |
    /// | `SSE_SUBSCRIBER_BUFFER`        | `64`                    |
    /// | `SSE_KEEP_ALIVE_SECS`          | `15`                    |
    /// | `MATCHUP_VOTE_POLICY`          | `any_status`            |
    /// | `MATCHUP_STATUS_INTERVAL_SECS` | `60`                    |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let sse_subscriber_buffer: usize = std::env::var("SSE_SUBSCRIBER_BUFFER")
            .unwrap_or_else(|_| DEFAULT_SUBSCRIBER_BUFFER.to_string())
            .parse()
            .expect("SSE_SUBSCRIBER_BUFFER must be a valid usize");
        assert!(sse_subscriber_buffer > 0, "SSE_SUBSCRIBER_BUFFER must be positive");

        let sse_keep_alive_secs: u64 = std::env::var("SSE_KEEP_ALIVE_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("SSE_KEEP_ALIVE_SECS must be a valid u64");

        let vote_policy = std::env::var("MATCHUP_VOTE_POLICY")
            .map(|raw| VotePolicy::parse(&raw).unwrap_or_else(|e| panic!("{e}")))
            .unwrap_or_default();

        let matchup_status_interval_secs: u64 = std::env::var("MATCHUP_STATUS_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("MATCHUP_STATUS_INTERVAL_SECS must be a valid u64");
        assert!(
            matchup_status_interval_secs > 0,
            "MATCHUP_STATUS_INTERVAL_SECS must be positive"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            sse_subscriber_buffer,
            sse_keep_alive_secs,
            vote_policy,
            matchup_status_interval_secs,
        }
    }
}
