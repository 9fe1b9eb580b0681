//! Micropost service: creation, destruction, and feed queries

use std::sync::Arc;

use crate::domain::feed::FeedQuery;
use crate::domain::micropost::{
    validate_micropost, ImageAttachment, Micropost, MicropostId, MicropostRepository, NewMicropost,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for creating a micropost. The owner is the acting identity,
/// passed explicitly; a post can only ever be created as oneself.
#[derive(Debug, Clone)]
pub struct CreateMicropostRequest {
    pub content: String,
    pub image: Option<ImageAttachment>,
}

/// Micropost service
#[derive(Debug, Clone)]
pub struct MicropostService {
    posts: Arc<dyn MicropostRepository>,
}

impl MicropostService {
    pub fn new(posts: Arc<dyn MicropostRepository>) -> Self {
        Self { posts }
    }

    /// Create a micropost owned by `actor`.
    pub async fn create(
        &self,
        actor: UserId,
        request: CreateMicropostRequest,
    ) -> Result<Micropost, DomainError> {
        validate_micropost(&request.content, request.image.as_ref()).map_err(|errors| {
            DomainError::validation_errors(errors.iter().map(|e| e.to_string()).collect())
        })?;

        self.posts
            .insert(NewMicropost::new(actor, request.content, request.image))
            .await
    }

    /// Destroy a post as `actor`. The lookup is scoped to the actor's own
    /// posts, so destroying someone else's post reports not-found exactly
    /// like a nonexistent id.
    pub async fn destroy(&self, actor: UserId, id: MicropostId) -> Result<bool, DomainError> {
        self.posts.delete_owned(id, actor).await
    }

    /// A user's own posts, newest first
    pub async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Micropost>, DomainError> {
        self.posts.list_by_owner(owner).await
    }

    /// The feed for `user_id`: their posts plus their followees', newest
    /// first. The followee set comes from the caller; the follow
    /// relationship itself lives outside this service.
    pub async fn feed(
        &self,
        user_id: UserId,
        followee_ids: impl IntoIterator<Item = UserId> + Send,
    ) -> Result<Vec<Micropost>, DomainError> {
        self.posts
            .feed(&FeedQuery::for_user(user_id, followee_ids))
            .await
    }
}
