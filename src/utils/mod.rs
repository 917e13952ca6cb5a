use bcrypt::{hash, verify};
use uuid::Uuid;

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// Opaque public identifier. Assigned once at creation and never changed.
pub fn generate_public_id() -> String {
    Uuid::new_v4().to_string()
}

/// Row offset for a 1-based page. Pages below 1 are treated as the first page.
/// `None` when the offset does not fit in an `i64`.
pub fn calculate_offset(limit: i64, page: i64) -> Option<i64> {
    limit.checked_mul(page.max(1) - 1)
}

pub mod messages {
    pub const OK: &str = "The operation was successful.";
    pub const ID_NOT_FOUND: &str = "ID not found in database.";
    pub const EMAIL_FOUND: &str = "E-mail already exists.";
    pub const LOGIN_SUCCESS: &str = "Login success";
    pub const LOGOUT_SUCCESS: &str = "Logged out successfully";
    pub const TOKEN_VALID: &str = "Token valid.";
    pub const TOKEN_MISSING: &str = "Token not provided.";
    pub const TOKEN_INVALID: &str = "Invalid or expired token";
    pub const TOKEN_VERIFICATION_FAILED: &str = "Token verification failed.";
    pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
    pub const USER_INACTIVE: &str = "The user is no longer active.";
    pub const ADMIN_ONLY: &str = "Admin access only";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_on_first_page() {
        assert_eq!(calculate_offset(10, 1), Some(0));
        assert_eq!(calculate_offset(10, 2), Some(10));
        assert_eq!(calculate_offset(25, 0), Some(0));
    }

    #[test]
    fn offset_overflow_is_none() {
        assert_eq!(calculate_offset(i64::MAX, 3), None);
        assert_eq!(calculate_offset(i64::MAX, 1), Some(0));
    }

    #[test]
    fn password_round_trip() {
        let hashed = hash_password("secret", 4 /* bcrypt minimum cost */).unwrap();
        assert!(verify_password("secret", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn public_ids_are_unique() {
        assert_ne!(generate_public_id(), generate_public_id());
    }
}
