//! In-memory micropost repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::feed::{self, FeedQuery};
use crate::domain::micropost::{Micropost, MicropostId, MicropostRepository, NewMicropost};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of MicropostRepository
#[derive(Debug)]
pub struct InMemoryMicropostRepository {
    posts: Arc<RwLock<HashMap<i64, Micropost>>>,
    next_id: AtomicI64,
}

impl InMemoryMicropostRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> MicropostId {
        MicropostId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for InMemoryMicropostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MicropostRepository for InMemoryMicropostRepository {
    async fn insert(&self, new_post: NewMicropost) -> Result<Micropost, DomainError> {
        let mut posts = self.posts.write().await;

        let post = new_post.into_micropost(self.allocate_id());
        posts.insert(post.id().value(), post.clone());

        Ok(post)
    }

    async fn delete_owned(&self, id: MicropostId, owner: UserId) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;

        let owned = posts
            .get(&id.value())
            .map(|p| p.user_id() == owner)
            .unwrap_or(false);

        if !owned {
            return Ok(false);
        }

        posts.remove(&id.value());
        Ok(true)
    }

    async fn delete_by_owner(&self, owner: UserId) -> Result<u64, DomainError> {
        let mut posts = self.posts.write().await;

        let before = posts.len();
        posts.retain(|_, p| p.user_id() != owner);

        Ok((before - posts.len()) as u64)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Micropost>, DomainError> {
        let posts = self.posts.read().await;

        Ok(feed::compose(
            &FeedQuery::for_user(owner, []),
            posts.values().cloned(),
        ))
    }

    async fn feed(&self, query: &FeedQuery) -> Result<Vec<Micropost>, DomainError> {
        let posts = self.posts.read().await;

        Ok(feed::compose(query, posts.values().cloned()))
    }
}
