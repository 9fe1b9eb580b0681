//! Micropost entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Micropost identifier, assigned by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MicropostId(i64);

impl MicropostId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MicropostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An attached image. Only metadata is modeled here; blob storage belongs
/// to an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub filename: String,
    pub content_type: String,
    pub byte_size: u64,
}

/// A micropost not yet persisted
#[derive(Debug, Clone)]
pub struct NewMicropost {
    user_id: UserId,
    content: String,
    image: Option<ImageAttachment>,
}

impl NewMicropost {
    pub fn new(user_id: UserId, content: impl Into<String>, image: Option<ImageAttachment>) -> Self {
        Self {
            user_id,
            content: content.into(),
            image,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    pub fn into_micropost(self, id: MicropostId) -> Micropost {
        Micropost {
            id,
            user_id: self.user_id,
            content: self.content,
            image: self.image,
            created_at: Utc::now(),
        }
    }
}

/// Micropost entity. Immutable after creation: there is no update path,
/// only create and destroy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Micropost {
    id: MicropostId,
    user_id: UserId,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImageAttachment>,
    created_at: DateTime<Utc>,
}

impl Micropost {
    /// Rebuild a micropost from stored columns. Used by repositories.
    pub fn from_parts(
        id: MicropostId,
        user_id: UserId,
        content: String,
        image: Option<ImageAttachment>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            content,
            image,
            created_at,
        }
    }

    pub fn id(&self) -> MicropostId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
