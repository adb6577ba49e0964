//! Cookie-based session tokens.
//!
//! `POST /jwt` signs an HS256 token carrying the caller's email and stores it
//! in the `token` cookie. Owner-scoped routes take a [`SessionUser`], which
//! rejects requests whose cookie is missing, tampered with, or expired.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use validator::Validate;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    /// Any other fields from the login payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /jwt`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionRequest {
    #[validate(email)]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signs and verifies session tokens.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        // Expired means expired: no clock tolerance.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign a token for a validated login payload.
    pub fn issue(&self, request: SessionRequest) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let mut extra = request.extra;
        extra.remove("iat");
        extra.remove("exp");

        let claims = SessionClaims {
            email: request.email,
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
            extra,
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &SessionClaims) -> ApiResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("failed to sign session token: {}", e)))
    }

    /// Check signature and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

/// Build the session cookie with the attributes for the current environment.
///
/// Production front-ends live on another origin, so the cookie must be
/// `Secure; SameSite=None` there.
pub fn session_cookie(config: &ApiConfig, token: String) -> Cookie<'static> {
    let (secure, same_site) = if config.is_production() {
        (true, SameSite::None)
    } else {
        (false, SameSite::Strict)
    };

    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(same_site)
        .path("/")
        .build()
}

/// Cookie that clears the session in the browser.
pub fn removal_cookie(config: &ApiConfig) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new());
    cookie.make_removal();
    cookie
}

/// Caller identity taken from a valid session cookie.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
    pub claims: SessionClaims,
}

impl SessionUser {
    /// Only the owner of `email` may read data partitioned by it.
    pub fn ensure_owner(&self, email: &str) -> ApiResult<()> {
        if self.email != email {
            warn!(caller = %self.email, requested = %email, "Owner check failed");
            return Err(ApiError::forbidden(format!(
                "{} may not read data for {}",
                self.email, email
            )));
        }
        Ok(())
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                debug!(path = %parts.uri.path(), "No session cookie");
                ApiError::unauthorized("missing session cookie")
            })?;

        let claims = state.sessions.verify(&token).map_err(|e| {
            warn!(error = %e, "Session token verification failed");
            ApiError::unauthorized(format!("invalid session token: {}", e))
        })?;

        Ok(SessionUser {
            email: claims.email.clone(),
            claims,
        })
    }
}
