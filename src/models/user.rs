use serde::{Deserialize, Serialize};

use crate::constants::{MAX_USERNAME_LEN, MIN_PASSWORD_LEN};
use crate::error::{AppError, Result};

/// User record stored in redb
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Salted bcrypt hash of the password
    pub password_hash: String,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

/// Registration / login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Validate credentials submitted for registration
    pub fn validate_new(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::InvalidArgument(
                "Username and password must not be empty".to_string(),
            ));
        }
        if self.username.chars().count() > MAX_USERNAME_LEN {
            return Err(AppError::InvalidArgument(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidArgument(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}
