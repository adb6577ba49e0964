//! API configuration.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Origins allowed to make credentialed requests when `CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "https://job-portal-4b52d.web.app",
    "https://job-portal-4b52d.firebaseapp.com",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// API server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub session_ttl: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout", &self.request_timeout)
            .field("max_body_size", &self.max_body_size)
            .field("environment", &self.environment)
            .field("jwt_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            jwt_secret: String::new(),
            session_ttl: Duration::from_secs(3600),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create config from a variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_var(&var, "PORT")?.unwrap_or(defaults.port),
            cors_origins: var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
                .unwrap_or(defaults.cors_origins),
            request_timeout: parse_var(&var, "REQUEST_TIMEOUT")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_size: parse_var(&var, "MAX_BODY_SIZE")?.unwrap_or(defaults.max_body_size),
            environment: var("NODE_ENV")
                .or_else(|| var("ENVIRONMENT"))
                .unwrap_or(defaults.environment),
            jwt_secret,
            session_ttl: parse_var(&var, "SESSION_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
