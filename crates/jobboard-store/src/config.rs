//! Store configuration.

use crate::error::{StoreError, StoreResult};

/// Default database name.
pub const DEFAULT_DATABASE: &str = "jobPortalDB";

/// URI used when no credentials are configured.
const LOCAL_URI: &str = "mongodb://localhost:27017";

/// Which store implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> StoreResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(StoreError::config(format!("unknown STORE_BACKEND '{}'", other))),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Connection string (MongoDB only)
    pub uri: String,
    /// Database holding the `jobs` and `applications` collections
    pub database: String,
    /// Application name reported to the server
    pub app_name: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongo,
            uri: LOCAL_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
        }
    }
}

impl StoreConfig {
    /// In-memory configuration.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create config from a variable lookup.
    ///
    /// `MONGODB_URI` wins; otherwise `DB_User`, `DB_Pass` and `DB_HOST` build
    /// an SRV connection string; with no credentials a local server is used.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let backend = StoreBackend::parse(&non_empty("STORE_BACKEND").unwrap_or_default())?;

        let uri = match non_empty("MONGODB_URI") {
            Some(uri) => uri,
            None => match (non_empty("DB_User"), non_empty("DB_Pass")) {
                (Some(user), Some(pass)) => {
                    let host = non_empty("DB_HOST").ok_or_else(|| {
                        StoreError::config("DB_HOST must be set when DB_User and DB_Pass are set")
                    })?;
                    format!(
                        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                        urlencoding::encode(&user),
                        urlencoding::encode(&pass),
                        host
                    )
                }
                (None, None) => LOCAL_URI.to_string(),
                _ => {
                    return Err(StoreError::config(
                        "DB_User and DB_Pass must be set together",
                    ))
                }
            },
        };

        Ok(Self {
            backend,
            uri,
            database: non_empty("DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            app_name: non_empty("MONGODB_APP_NAME"),
        })
    }
}
