use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Credentials, UserRecord};
use crate::routes::validation::AppJson;
use crate::routes::AuthUser;
use crate::security::{hash_password, issue_session_token, verify_password};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new user
///
/// Creates the user and an empty ledger (no points, rewards or tasks) in a
/// single transaction. Returns 409 Conflict if the username is taken.
pub async fn register_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<Json<RegisterResponse>> {
    payload.validate_new()?;

    let store = state.store.clone();
    let cost = state.config.bcrypt_cost;
    let username = payload.username.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let record = UserRecord {
            password_hash: hash_password(&payload.password, cost)?,
            created_at: Utc::now().timestamp(),
        };
        store.create_user(&payload.username, &record)
    })
    .await??;

    tracing::info!("New user registered: {}", username);

    Ok(Json(RegisterResponse { success: true }))
}

/// Log in and receive a session token
///
/// Unknown usernames and wrong passwords produce the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<Json<LoginResponse>> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidArgument(
            "Username and password must not be empty".to_string(),
        ));
    }

    let store = state.store.clone();
    let username = payload.username.clone();

    let verified = tokio::task::spawn_blocking(move || -> Result<bool> {
        match store.find_user(&payload.username)? {
            Some(record) => verify_password(&payload.password, &record.password_hash),
            None => Ok(false),
        }
    })
    .await??;

    if !verified {
        tracing::warn!("Failed login for {}", username);
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_session_token(
        &username,
        Utc::now().timestamp(),
        &state.config.session_secret_key,
    )
    .map_err(|_| AppError::SessionKey)?;

    tracing::info!("User logged in: {}", username);

    Ok(Json(LoginResponse { username, token }))
}

/// Delete the caller's account and ledger
///
/// This action is irreversible.
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<DeleteAccountResponse>> {
    let store = state.store.clone();
    let user = username.clone();

    tokio::task::spawn_blocking(move || store.delete_user(&user)).await??;

    tracing::info!("User and ledger deleted: {}", username);

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: "Account and all associated data permanently deleted".to_string(),
    }))
}

/// Keep-alive for long countdowns; only checks the session
pub async fn heartbeat(_user: AuthUser) -> StatusCode {
    StatusCode::NO_CONTENT
}
