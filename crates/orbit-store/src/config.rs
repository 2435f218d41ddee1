//! MongoDB connection configuration.

use std::time::Duration;

use crate::error::{StoreError, StoreResult};

const DEFAULT_HOST: &str = "cluster0.mkuqnbp.mongodb.net";
const DEFAULT_DATABASE: &str = "work_orbit_db";
const DEFAULT_APP_NAME: &str = "Cluster0";

/// MongoDB client configuration.
#[derive(Clone)]
pub struct MongoConfig {
    /// Connection string
    pub uri: String,
    /// Database holding the five collections
    pub database: String,
    /// Application name reported to the server
    pub app_name: String,
    /// How long to wait for a usable server before failing an operation
    pub server_selection_timeout: Duration,
}

impl std::fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URI carries credentials.
        f.debug_struct("MongoConfig")
            .field("uri", &"<redacted>")
            .field("database", &self.database)
            .field("app_name", &self.app_name)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .finish()
    }
}

impl MongoConfig {
    /// Create config from environment variables.
    ///
    /// `MONGODB_URI` wins when set; otherwise the SRV URI is assembled from
    /// `WORK_ORBIT_USER`, `WORK_ORBIT_PASSWORD` and `MONGODB_HOST`.
    pub fn from_env() -> StoreResult<Self> {
        let app_name =
            std::env::var("MONGODB_APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());

        let uri = match std::env::var("MONGODB_URI") {
            Ok(uri) if !uri.trim().is_empty() => uri,
            _ => {
                let user = std::env::var("WORK_ORBIT_USER").map_err(|_| {
                    StoreError::config("MONGODB_URI or WORK_ORBIT_USER must be set")
                })?;
                let password = std::env::var("WORK_ORBIT_PASSWORD").map_err(|_| {
                    StoreError::config("MONGODB_URI or WORK_ORBIT_PASSWORD must be set")
                })?;
                let host =
                    std::env::var("MONGODB_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
                srv_uri(&user, &password, &host, &app_name)
            }
        };

        let timeout_secs: u64 = std::env::var("MONGODB_SERVER_SELECTION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            uri,
            database: std::env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            app_name,
            server_selection_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Build an Atlas SRV connection string with percent-encoded credentials.
pub fn srv_uri(user: &str, password: &str, host: &str, app_name: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName={}",
        urlencoding::encode(user),
        urlencoding::encode(password),
        host,
        urlencoding::encode(app_name),
    )
}
