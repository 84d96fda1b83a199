//! Argon2 password hashing implementation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use blog_core::ports::{AuthError, PasswordService};

/// Argon2-based password service.
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// Accounts without a usable hash (such as the seeded anonymous author)
    /// never match.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a PHC string; rejecting login");
            return Ok(false);
        };

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
