//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash_password("portaria2024").unwrap();

        assert!(verify_password("portaria2024", &hashed).unwrap());
        assert!(!verify_password("portaria2025", &hashed).unwrap());
    }
}
