use std::sync::OnceLock;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use regex::Regex;

use crate::errors::AppError;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Basic email shape check: local part, `@`, domain with at least one dot.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
                .expect("email regex must compile")
        })
        .is_match(email)
}

/// Rejects missing or malformed emails with `InvalidUser`.
pub fn require_valid_email(email: Option<&str>) -> Result<&str, AppError> {
    match email {
        Some(e) if is_valid_email(e) => Ok(e),
        _ => Err(AppError::InvalidUser("Invalid user email".to_string())),
    }
}

/// Hashes a password with Argon2id and a fresh random salt (PHC string format).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verifies a password against a stored PHC hash. Unparseable hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!("Failed to parse stored password hash: {e}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("amy@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("amy"));
        assert!(!is_valid_email("amy@localhost"));
        assert!(!is_valid_email("amy@@example.com"));
        assert!(!is_valid_email("amy smith@example.com"));
    }

    #[test]
    fn test_require_valid_email() {
        assert!(require_valid_email(Some("amy@example.com")).is_ok());
        assert!(matches!(
            require_valid_email(None),
            Err(AppError::InvalidUser(_))
        ));
        assert!(matches!(
            require_valid_email(Some("nope")),
            Err(AppError::InvalidUser(_))
        ));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("secret123", "not-a-hash"));
    }
}
