//! Session issuance and logout.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::auth::{removal_cookie, session_cookie, SessionRequest};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
}

/// `POST /jwt`: sign a session token and set it as the `token` cookie.
pub async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    let request: SessionRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid session payload: {}", e)))?;
    request.validate()?;

    let email = request.email.clone();
    let token = state.sessions.issue(request)?;

    metrics::record_session_issued();
    info!(email = %email, "Session issued");

    Ok((
        jar.add(session_cookie(&state.config, token)),
        Json(SessionResponse { success: true }),
    ))
}

/// `POST /logout`: clear the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    (
        jar.add(removal_cookie(&state.config)),
        Json(SessionResponse { success: true }),
    )
}
