//! Secret hashing using Argon2
//!
//! Hashes both passwords and the random tokens of the remember, activation
//! and reset flows. Only digests are ever persisted.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Argon2 cost parameters. The defaults are the secure production values;
/// `fast()` lowers the cost so test suites stay quick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct HasherCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HasherCost {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HasherCost {
    /// Minimal cost for test environments. Not for production use.
    pub fn fast() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Trait for secret hashing operations
pub trait SecretHasher: Send + Sync + Debug {
    /// Hash a plaintext secret
    fn hash(&self, secret: &str) -> Result<String, DomainError>;

    /// Verify a candidate against a stored digest.
    ///
    /// A `None` digest means no credential of that kind is set and always
    /// verifies false; so does a malformed digest. Neither is an error to
    /// a caller performing a boolean check.
    fn verify(&self, digest: Option<&str>, candidate: &str) -> bool;
}

/// Argon2-based secret hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    cost: HasherCost,
}

impl Argon2Hasher {
    pub fn new(cost: HasherCost) -> Self {
        Self { cost }
    }

    fn argon2(&self) -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(
            self.cost.memory_kib,
            self.cost.iterations,
            self.cost.parallelism,
            None,
        )
        .map_err(|e| DomainError::internal(format!("Invalid hasher cost: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(HasherCost::default())
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()?
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash secret: {}", e)))
    }

    fn verify(&self, digest: Option<&str>, candidate: &str) -> bool {
        let Some(digest) = digest else {
            return false;
        };

        let parsed = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Cost parameters are read back from the digest itself, so hashes
        // created under a different cost still verify.
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}
