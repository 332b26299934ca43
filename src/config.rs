//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Example
//!
//! ```bash
//! export PORT=8080
//! export GRPC_PORT=50051
//! export DOMAIN="https://sho.rt/"
//! export DATABASE_URL="sqlite://urlshort.db"
//! ```
//!
//! ## Variables
//!
//! - `LISTEN` - HTTP bind address (default: `0.0.0.0:$PORT`)
//! - `PORT` - HTTP port used when `LISTEN` is unset (default: `8080`)
//! - `GRPC_LISTEN` - gRPC bind address (default: `0.0.0.0:$GRPC_PORT`)
//! - `GRPC_PORT` - gRPC port used when `GRPC_LISTEN` is unset (default: `50051`)
//! - `DOMAIN` - Prefix of every short URL (default: `localhost:$PORT/`)
//! - `DATABASE_URL` / `DB_CONN` - SQLite database (default: `sqlite://urlshort.db`)
//! - `STORAGE_BACKEND` - `sqlite` or `memory` (default: `sqlite`)
//! - `SHORT_ID_BYTES` - Random bytes per short id, 4 to 24 (default: `6`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: `5`)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: `30`)
//! - `REQUEST_TIMEOUT_SECONDS` - Per-request deadline (default: `30`)
//! - `SHUTDOWN_TIMEOUT_SECONDS` - Graceful shutdown bound (default: `10`)

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::infrastructure::generator::random_id_generator::{
    DEFAULT_ID_BYTES, MAX_ID_BYTES, MIN_ID_BYTES,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GRPC_PORT: u16 = 50051;
const DEFAULT_DATABASE_URL: &str = "sqlite://urlshort.db";

/// Storage backend names accepted by `STORAGE_BACKEND`.
pub const STORAGE_SQLITE: &str = "sqlite";
pub const STORAGE_MEMORY: &str = "memory";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address.
    pub listen_addr: String,
    /// gRPC bind address.
    pub grpc_listen_addr: String,
    /// Prefix joined with each short id to form the public short URL.
    pub domain: String,
    pub database_url: String,
    pub storage_backend: String,
    pub short_id_bytes: usize,
    pub log_level: String,
    pub log_format: String,

    // ── Pool settings ───────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,

    // ── Request lifecycle ───────────────────────────────────────────────────
    /// Deadline applied to every HTTP request (`REQUEST_TIMEOUT_SECONDS`).
    pub request_timeout_seconds: u64,
    /// How long in-flight requests may take to drain on shutdown
    /// (`SHUTDOWN_TIMEOUT_SECONDS`).
    pub shutdown_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            grpc_listen_addr: format!("0.0.0.0:{DEFAULT_GRPC_PORT}"),
            domain: format!("localhost:{DEFAULT_PORT}/"),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage_backend: STORAGE_SQLITE.to_string(),
            short_id_bytes: DEFAULT_ID_BYTES,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            db_max_connections: 5,
            db_connect_timeout: 30,
            request_timeout_seconds: 30,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset variables and unparsable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` or `GRPC_PORT` is set but is not a port number.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = parse_port("PORT", DEFAULT_PORT)?;
        let grpc_port = parse_port("GRPC_PORT", DEFAULT_GRPC_PORT)?;

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| format!("0.0.0.0:{port}"));
        let grpc_listen_addr =
            env::var("GRPC_LISTEN").unwrap_or_else(|_| format!("0.0.0.0:{grpc_port}"));
        let domain = env::var("DOMAIN").unwrap_or_else(|_| format!("localhost:{port}/"));

        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DB_CONN"))
            .unwrap_or(defaults.database_url);

        let storage_backend = env::var("STORAGE_BACKEND")
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or(defaults.storage_backend);

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        Ok(Self {
            listen_addr,
            grpc_listen_addr,
            domain,
            database_url,
            storage_backend,
            short_id_bytes: parse_or("SHORT_ID_BYTES", defaults.short_id_bytes),
            log_level,
            log_format,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            db_connect_timeout: parse_or("DB_CONNECT_TIMEOUT", defaults.db_connect_timeout),
            request_timeout_seconds: parse_or(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            shutdown_timeout_seconds: parse_or(
                "SHUTDOWN_TIMEOUT_SECONDS",
                defaults.shutdown_timeout_seconds,
            ),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - either listen address is not a socket address
    /// - `database_url` is not a `sqlite:` URL
    /// - `storage_backend` is neither `sqlite` nor `memory`
    /// - `short_id_bytes` is outside 4..=24
    /// - a pool size or timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("LISTEN must be 'host:port', got '{}'", self.listen_addr))?;

        self.grpc_listen_addr.parse::<SocketAddr>().with_context(|| {
            format!(
                "GRPC_LISTEN must be 'host:port', got '{}'",
                self.grpc_listen_addr
            )
        })?;

        if self.storage_backend != STORAGE_SQLITE && self.storage_backend != STORAGE_MEMORY {
            anyhow::bail!(
                "STORAGE_BACKEND must be '{STORAGE_SQLITE}' or '{STORAGE_MEMORY}', got '{}'",
                self.storage_backend
            );
        }

        if self.storage_backend == STORAGE_SQLITE && !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !(MIN_ID_BYTES..=MAX_ID_BYTES).contains(&self.short_id_bytes) {
            anyhow::bail!(
                "SHORT_ID_BYTES must be between {MIN_ID_BYTES} and {MAX_ID_BYTES}, got {}",
                self.short_id_bytes
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }
        if self.request_timeout_seconds == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECONDS must be greater than 0");
        }
        if self.shutdown_timeout_seconds == 0 {
            anyhow::bail!("SHUTDOWN_TIMEOUT_SECONDS must be greater than 0");
        }

        Ok(())
    }

    /// Returns whether URLs are kept in process memory only.
    pub fn is_memory_backend(&self) -> bool {
        self.storage_backend == STORAGE_MEMORY
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  HTTP address: {}", self.listen_addr);
        tracing::info!("  gRPC address: {}", self.grpc_listen_addr);
        tracing::info!("  Domain: {}", self.domain);

        if self.is_memory_backend() {
            tracing::info!("  Storage: memory (not persisted)");
        } else {
            tracing::info!("  Storage: {}", self.database_url);
        }

        tracing::info!("  Short id bytes: {}", self.short_id_bytes);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Request timeout: {}s", self.request_timeout_seconds);
    }
}

/// Parses a numeric variable, falling back to `default` when it is unset or
/// malformed.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_port(name: &str, default: u16) -> Result<u16> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be a port number, got '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
