use bcrypt::{DEFAULT_COST, hash, verify};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(bcrypt::BcryptError),
}

/// Salted, slow, one-way hashing with a tunable cost factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(PasswordError::HashingFailed)
    }

    /// A stored hash in an unknown or corrupt format counts as a mismatch,
    /// not an error, so hash-format rotations never lock anyone out of the
    /// verification path itself.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        verify(password, stored_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::PasswordHasher;

    #[test]
    fn verify_returns_true_when_password_matches() {
        let hasher = PasswordHasher::with_cost(4);
        let hashed = hasher.hash("secure_password_@123P").expect("hashing");

        assert!(hasher.verify("secure_password_@123P", &hashed));
    }

    #[test]
    fn verify_returns_false_when_password_does_not_match() {
        let hasher = PasswordHasher::with_cost(4);
        let hashed = hasher.hash("secure_password_@123P").expect("hashing");

        assert!(!hasher.verify("wrong_password_@123", &hashed));
    }

    #[test]
    fn hashes_differ_for_identical_passwords() {
        let hasher = PasswordHasher::with_cost(4);
        let hash1 = hasher.hash("same_password").unwrap();
        let hash2 = hasher.hash("same_password").unwrap();

        // Random salt per call.
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("same_password", &hash1));
        assert!(hasher.verify("same_password", &hash2));
    }

    #[test]
    fn verify_treats_malformed_hash_as_mismatch() {
        let hasher = PasswordHasher::with_cost(4);

        assert!(!hasher.verify("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn verify_fails_when_case_differs() {
        let hasher = PasswordHasher::with_cost(4);
        let hashed = hasher.hash("MyPassword").unwrap();

        assert!(!hasher.verify("mypassword", &hashed));
    }
}
