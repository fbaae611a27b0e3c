//! Identity extraction for Axum
//!
//! The acting user arrives in `X-User-Id`, `X-User-Role` and `X-User-Admin`
//! headers set by the fronting auth layer. When a shared API token is
//! configured, `Authorization: Bearer <token>` must match it as well.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use colony_store::User;
use serde::Serialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

/// Authentication settings, installed as a request extension
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    /// Shared bearer token; `None` disables the check
    pub api_token: Option<String>,
}

impl AuthSettings {
    pub fn new(api_token: Option<String>) -> Self {
        Self { api_token }
    }
}

/// Reasons a request is rejected before reaching a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials,
    MissingIdentity,
    Internal(String),
}

/// JSON error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl AuthErrorResponse {
    fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    body: AuthErrorResponse,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                body: AuthErrorResponse::new(
                    "Authentication required. Provide Authorization: Bearer <token>.",
                    "UNAUTHORIZED",
                ),
            },
            AuthError::InvalidCredentials => AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                body: AuthErrorResponse::new("Invalid token", "INVALID_CREDENTIALS"),
            },
            AuthError::MissingIdentity => AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                body: AuthErrorResponse::new(
                    "Missing X-User-Id header",
                    "MISSING_IDENTITY",
                ),
            },
            AuthError::Internal(msg) => AuthRejection {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: AuthErrorResponse::new(msg, "INTERNAL_ERROR"),
            },
        }
    }
}

/// Axum extractor yielding the acting user.
pub struct RequireUser(pub User);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let settings = parts
            .extensions
            .get::<Arc<AuthSettings>>()
            .ok_or_else(|| AuthError::Internal("AuthSettings not configured".to_string()))?;

        if let Some(expected) = settings.api_token.as_deref() {
            let token = extract_bearer(parts).ok_or(AuthError::MissingCredentials)?;
            if !token_matches(token, expected) {
                return Err(AuthError::InvalidCredentials.into());
            }
        }

        Ok(RequireUser(extract_user(parts)?))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

fn extract_bearer(parts: &Parts) -> Option<&str> {
    header(parts, "authorization")?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Constant-time comparison of the presented token against the configured one
fn token_matches(presented: &str, expected: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}

fn extract_user(parts: &Parts) -> std::result::Result<User, AuthError> {
    let id = header(parts, USER_ID_HEADER)
        .filter(|id| !id.is_empty())
        .ok_or(AuthError::MissingIdentity)?;
    let role = header(parts, USER_ROLE_HEADER).unwrap_or_default();
    let is_admin = header(parts, USER_ADMIN_HEADER)
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    Ok(User {
        id: id.to_string(),
        role: role.to_string(),
        is_admin,
    })
}
