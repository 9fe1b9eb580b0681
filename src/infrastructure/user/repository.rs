//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Storage maps, kept behind one lock so readers and writers can never
/// interleave acquisition and wedge each other.
#[derive(Debug, Default)]
struct Inner {
    users: HashMap<i64, User>,
    /// Index for email -> user ID lookup; emails are stored lower-cased
    email_index: HashMap<String, i64>,
}

/// In-memory implementation of UserRepository
#[derive(Debug)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> UserId {
        UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id.value()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .email_index
            .get(&email.to_lowercase())
            .and_then(|user_id| inner.users.get(user_id))
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let email = new_user.email().to_string();

        if inner.email_index.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already taken",
                email
            )));
        }

        let user = new_user.into_user(self.allocate_id());

        inner.email_index.insert(email, user.id().value());
        inner.users.insert(user.id().value(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let id = user.id().value();

        let Some(old_user) = inner.users.get(&id) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        // If the email changed, check uniqueness and move the index entry
        let old_email = old_user.email().to_string();
        let new_email = user.email().to_string();

        if old_email != new_email {
            if inner.email_index.contains_key(&new_email) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' is already taken",
                    new_email
                )));
            }

            inner.email_index.remove(&old_email);
            inner.email_index.insert(new_email, id);
        }

        inner.users.insert(id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.users.remove(&id.value()) {
            Some(user) => {
                inner.email_index.remove(user.email());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_activated(&self) -> Result<Vec<User>, DomainError> {
        let inner = self.inner.read().await;

        let mut activated: Vec<User> =
            inner.users.values().filter(|u| u.is_activated()).cloned().collect();
        activated.sort_by_key(|u| u.id());

        Ok(activated)
    }
}
