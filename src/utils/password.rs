use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies_only_with_original() {
        let hashed = hash_password("password123").unwrap();
        assert_ne!(hashed, "password123");
        assert!(verify_password("password123", &hashed));
        assert!(!verify_password("password124", &hashed));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("password123", "not-a-bcrypt-hash"));
    }
}
