//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage.
///
/// The storage layer enforces case-insensitive email uniqueness; emails are
/// already lower-cased by the time they reach a repository.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their email (for login and reset flows)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user, assigning its id
    async fn insert(&self, new_user: NewUser) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user. Returns false when the id was unknown.
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// List activated users, oldest first
    async fn list_activated(&self) -> Result<Vec<User>, DomainError>;

    /// Check whether an email is already taken
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
