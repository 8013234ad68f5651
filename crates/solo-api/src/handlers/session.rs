//! Session handlers: token issuance and logout.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{expired_cookie, issue_token, session_cookie};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Identity payload for token issuance.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// POST /jwt
///
/// Issue an identity token for the supplied email and set it as an
/// HTTP-only cookie. No credential check happens here: the upstream
/// identity provider has already authenticated the user, this endpoint
/// only mints the backend session.
pub async fn issue_jwt(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<TokenRequest>,
) -> ApiResult<(CookieJar, Json<SuccessResponse>)> {
    if payload.email.is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }

    let token = issue_token(&payload.email, &state.config.jwt_secret)?;
    info!("Issued session token for {}", payload.email);

    let jar = jar.add(session_cookie(token, &state.config));
    Ok((jar, Json(SuccessResponse { success: true })))
}

/// GET /logout
///
/// Clear the identity cookie by issuing an immediately-expired replacement.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.add(expired_cookie(&state.config));
    (jar, Json(SuccessResponse { success: true }))
}
