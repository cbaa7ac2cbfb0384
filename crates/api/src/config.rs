use std::str::FromStr;

/// Which [`NoteStore`](noteroom_db::NoteStore) implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Invalid store backend '{other}'. Must be one of: postgres, memory"
            )),
        }
    }
}

/// What the server does when a client's mutation fails.
///
/// Other room members never see a failed mutation either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationFailurePolicy {
    /// Log, and send a `note_error` frame to the originating connection.
    Notify,
    /// Log only.
    Log,
}

impl FromStr for MutationFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notify" => Ok(MutationFailurePolicy::Notify),
            "log" => Ok(MutationFailurePolicy::Log),
            other => Err(format!(
                "Invalid mutation failure policy '{other}'. Must be one of: notify, log"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Interval between WebSocket pings, in seconds (default: `30`).
    pub heartbeat_interval_secs: u64,
    /// Note store implementation (default: `postgres`).
    pub store_backend: StoreBackend,
    /// Name of the shared channel every connection joins (default: `app`).
    pub room_channel: String,
    /// Cap on the number of notes in a `list_note` broadcast. `None` sends
    /// the full set; `count` always reports the total.
    pub broadcast_limit: Option<usize>,
    /// Behaviour on failed mutations (default: `notify`).
    pub failure_policy: MutationFailurePolicy,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `HOST`                    | `0.0.0.0`                |
    /// | `PORT`                    | `5000`                   |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                     |
    /// | `HEARTBEAT_INTERVAL_SECS` | `30`                     |
    /// | `STORE_BACKEND`           | `postgres`               |
    /// | `ROOM_CHANNEL`            | `app`                    |
    /// | `BROADCAST_LIMIT`         | unset                    |
    /// | `MUTATION_FAILURE_POLICY` | `notify`                 |
    /// | `LOG_FORMAT`              | `text`                   |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "5000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let heartbeat_interval_secs: u64 = env_or("HEARTBEAT_INTERVAL_SECS", "30")
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .expect("HEARTBEAT_INTERVAL_SECS must be a positive u64");

        let store_backend: StoreBackend = env_or("STORE_BACKEND", "postgres")
            .parse()
            .unwrap_or_else(|e| panic!("STORE_BACKEND: {e}"));

        let room_channel = env_or("ROOM_CHANNEL", "app");

        let broadcast_limit: Option<usize> = std::env::var("BROADCAST_LIMIT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| {
                v.trim()
                    .parse()
                    .expect("BROADCAST_LIMIT must be a non-negative integer")
            });

        let failure_policy: MutationFailurePolicy = env_or("MUTATION_FAILURE_POLICY", "notify")
            .parse()
            .unwrap_or_else(|e| panic!("MUTATION_FAILURE_POLICY: {e}"));

        let log_json = env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            heartbeat_interval_secs,
            store_backend,
            room_channel,
            broadcast_limit,
            failure_policy,
            log_json,
        }
    }
}
