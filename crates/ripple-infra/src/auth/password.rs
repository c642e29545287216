//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use ripple_core::ports::{AuthError, PasswordService};

/// Argon2id with a fresh random salt per hash. Hashes are stored in PHC
/// string form, so parameters travel with the hash.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// A wrong password is `Ok(false)`; only an unreadable stored hash is an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let passwords = Argon2PasswordService::new();
        let hash = passwords.hash("secret123").unwrap();

        assert!(passwords.verify("secret123", &hash).unwrap());
        assert!(!passwords.verify("secret124", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let passwords = Argon2PasswordService::new();
        let a = passwords.hash("secret123").unwrap();
        let b = passwords.hash("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unreadable_hash_is_an_error() {
        let passwords = Argon2PasswordService::new();
        assert!(matches!(
            passwords.verify("secret123", "plain-text"),
            Err(AuthError::HashingError(_))
        ));
    }
}
