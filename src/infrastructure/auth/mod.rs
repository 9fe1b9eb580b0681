//! Credential store: secret hashing and token generation

pub mod password;
pub mod token;

pub use password::{Argon2Hasher, HasherCost, SecretHasher};
pub use token::generate_token;
