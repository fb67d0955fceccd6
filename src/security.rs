use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::constants::MAX_SESSION_CLOCK_SKEW_SECS;
use crate::error::Result;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password with a fresh bcrypt salt
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, password_hash)?)
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Issue a signed session token for `username`
///
/// # Format
/// `hex(username).issued_at.hex(HMAC-SHA256(secret, "username:issued_at"))`
///
/// The username is hex-encoded so it may contain any character, including
/// the `.` separator.
pub fn issue_session_token(
    username: &str,
    issued_at: i64,
    secret: &str,
) -> std::result::Result<String, InvalidLength> {
    let signature = sign(&session_payload(username, issued_at), secret)?;
    Ok(format!("{}.{}.{}", hex::encode(username), issued_at, signature))
}

/// Verify a session token and return the username it was issued for
///
/// Returns `None` for malformed tokens, bad signatures, and tokens older than
/// `max_age_secs` (or issued in the future).
pub fn verify_session_token(token: &str, secret: &str, max_age_secs: i64) -> Option<String> {
    let mut parts = token.split('.');
    let (Some(user_hex), Some(issued_at), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::warn!("Malformed session token");
        return None;
    };

    let username = String::from_utf8(hex::decode(user_hex).ok()?).ok()?;
    let issued_at: i64 = issued_at.parse().ok()?;

    if !verify_hmac(&session_payload(&username, issued_at), signature, secret) {
        tracing::warn!("Invalid session token signature");
        return None;
    }

    if !validate_session_age(issued_at, max_age_secs) {
        return None;
    }

    Some(username)
}

fn session_payload(username: &str, issued_at: i64) -> String {
    format!("{username}:{issued_at}")
}

fn sign(data: &str, secret: &str) -> std::result::Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify HMAC-SHA256 signature
pub fn verify_hmac(data: &str, signature: &str, secret: &str) -> bool {
    // Create HMAC instance with secret key
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    // Update with data
    mac.update(data.as_bytes());

    // Decode hex signature
    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    // Verify signature (constant time)
    mac.verify_slice(&sig_bytes).is_ok()
}

/// Validate a session's issue time
///
/// Tokens expire after `max_age_secs`; a small skew is tolerated for tokens
/// that appear to be issued in the future.
pub fn validate_session_age(issued_at: i64, max_age_secs: i64) -> bool {
    let now = chrono::Utc::now().timestamp();
    let age_seconds = now - issued_at;

    if age_seconds > max_age_secs {
        tracing::info!(
            "Session expired: {} seconds old (max: {})",
            age_seconds,
            max_age_secs
        );
        return false;
    }

    if age_seconds < -MAX_SESSION_CLOCK_SKEW_SECS {
        tracing::warn!("Session issued {} seconds in the future", -age_seconds);
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-session-secret";
    const MAX_AGE: i64 = 3600;

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter22", 4).unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("same-password", 4).unwrap();
        let b = hash_password("same-password", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_token_valid() {
        let token = issue_session_token("alice", now(), SECRET).unwrap();
        assert_eq!(
            verify_session_token(&token, SECRET, MAX_AGE),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_session_token_username_with_separator() {
        let token = issue_session_token("a.b.c", now(), SECRET).unwrap();
        assert_eq!(
            verify_session_token(&token, SECRET, MAX_AGE),
            Some("a.b.c".to_string())
        );
    }

    #[test]
    fn test_session_token_wrong_secret() {
        let token = issue_session_token("alice", now(), SECRET).unwrap();
        assert_eq!(verify_session_token(&token, "other-secret", MAX_AGE), None);
    }

    #[test]
    fn test_session_token_tampered_username() {
        let token = issue_session_token("alice", now(), SECRET).unwrap();
        let (_, rest) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", hex::encode("mallory"), rest);
        assert_eq!(verify_session_token(&forged, SECRET, MAX_AGE), None);
    }

    #[test]
    fn test_session_token_expired() {
        let token = issue_session_token("alice", now() - MAX_AGE - 10, SECRET).unwrap();
        assert_eq!(verify_session_token(&token, SECRET, MAX_AGE), None);
    }

    #[test]
    fn test_session_token_from_the_future() {
        let token = issue_session_token("alice", now() + 600, SECRET).unwrap();
        assert_eq!(verify_session_token(&token, SECRET, MAX_AGE), None);
    }

    #[test]
    fn test_session_token_malformed() {
        assert_eq!(verify_session_token("", SECRET, MAX_AGE), None);
        assert_eq!(verify_session_token("abc", SECRET, MAX_AGE), None);
        assert_eq!(verify_session_token("zz.1.00", SECRET, MAX_AGE), None);
        assert_eq!(verify_session_token("61.x.00", SECRET, MAX_AGE), None);
        assert_eq!(verify_session_token("61.1.00.extra", SECRET, MAX_AGE), None);
    }

    #[test]
    fn test_verify_hmac_invalid_hex() {
        assert!(!verify_hmac("data", "not-hex", SECRET));
    }
}
