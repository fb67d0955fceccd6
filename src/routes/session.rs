use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::security::verify_session_token;
use crate::AppState;

/// Username of the caller, taken from a `Authorization: Bearer` session token
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        verify_session_token(
            token.trim(),
            &state.config.session_secret_key,
            state.config.session_max_age_secs,
        )
        .map(AuthUser)
        .ok_or(AppError::Unauthorized)
    }
}
