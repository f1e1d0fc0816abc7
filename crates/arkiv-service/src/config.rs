//! Environment-driven configuration for wiring up the service.
//!
//! Values are read from the process environment (with `.env` support) and
//! fall back to sensible defaults, so a bare `ServiceConfig::from_env()` is
//! enough for local use.

/// Connection settings for the two stores.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// PostgreSQL connection URL (`DATABASE_URL`).
    pub database_url: String,
    /// Base directory for the filesystem blob backend (`BLOB_STORAGE_PATH`).
    pub blob_storage_path: String,
    /// Connection pool size (`DATABASE_MAX_CONNECTIONS`).
    pub pool_max_connections: u32,
}

impl ServiceConfig {
    /// Read configuration from the environment, loading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/arkiv".to_string());
        let blob_storage_path = std::env::var("BLOB_STORAGE_PATH")
            .unwrap_or_else(|_| "/var/lib/arkiv/blobs".to_string());
        let pool_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            database_url,
            blob_storage_path,
            pool_max_connections,
        }
    }
}
