//! Micropost repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Micropost, MicropostId, NewMicropost};
use crate::domain::feed::FeedQuery;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for micropost storage.
///
/// Operations that act on a single post are scoped to an owner: a post
/// that exists but belongs to someone else behaves exactly like a
/// missing id. There is deliberately no update operation.
#[async_trait]
pub trait MicropostRepository: Send + Sync + Debug {
    /// Persist a new micropost, assigning its id
    async fn insert(&self, new_post: NewMicropost) -> Result<Micropost, DomainError>;

    /// Delete a post by id, scoped to its owner. Returns false when no
    /// owned post matched.
    async fn delete_owned(&self, id: MicropostId, owner: UserId) -> Result<bool, DomainError>;

    /// Delete every post owned by a user (cascade on user deletion).
    /// Returns the number of posts removed.
    async fn delete_by_owner(&self, owner: UserId) -> Result<u64, DomainError>;

    /// A user's own posts, newest first
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Micropost>, DomainError>;

    /// Evaluate a feed query: posts owned by any id in the query,
    /// newest first
    async fn feed(&self, query: &FeedQuery) -> Result<Vec<Micropost>, DomainError>;
}
