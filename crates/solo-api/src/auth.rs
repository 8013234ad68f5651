//! Identity verification and token issuance.
//!
//! Identity rides an HTTP-only cookie named `token`, carrying an HS256 JWT
//! with a 5-hour expiry. Verification is a pure function of (token, secret,
//! clock): missing, malformed or expired tokens reject with `Unauthorized`
//! before any handler logic runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the signed identity claim.
pub const SESSION_COOKIE: &str = "token";

/// Token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 5;

/// Decoded identity claim. Exists only for the duration of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller's email, the ownership key for scoped queries.
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Sign an identity token for the given email.
pub fn issue_token(email: &str, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        email: email.to_string(),
        iat: now,
        exp: now + TOKEN_TTL_HOURS * 3600,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("failed to sign token: {e}")))
}

/// Verify a token string, producing the decoded claim.
///
/// Rejects bad signatures and expired tokens alike as `Unauthorized`.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("invalid or expired token"))
}

/// Build the session cookie carrying a freshly issued token.
///
/// `secure`/`SameSite` vary by deployment environment: cross-site in
/// production (frontend on another origin), strict in development.
pub fn session_cookie(token: String, config: &ApiConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(token, config);
    cookie.set_max_age(time::Duration::hours(TOKEN_TTL_HOURS));
    cookie
}

/// Build the logout cookie: an immediately-expired replacement.
pub fn expired_cookie(config: &ApiConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(String::new(), config);
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

fn base_cookie(value: String, config: &ApiConfig) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(config.is_production());
    cookie.set_same_site(if config.is_production() {
        SameSite::None
    } else {
        SameSite::Strict
    });
    cookie
}

/// Verified caller identity, extracted from the session cookie.
///
/// Handlers taking an `AuthUser` parameter are the protected operations;
/// extraction failing short-circuits the request with a 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    /// Ownership check: the verified claim must match the requested owner.
    pub fn require_email(&self, email: &str) -> Result<(), ApiError> {
        if self.claims.email == email {
            Ok(())
        } else {
            Err(ApiError::unauthorized("token does not match requested user"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::unauthorized("missing credentials"))?;

        let token = jar
            .get(SESSION_COOKIE)
            .ok_or_else(|| ApiError::unauthorized("missing token"))?;

        let claims = verify_token(token.value(), &state.config.jwt_secret)?;
        Ok(AuthUser { claims })
    }
}
