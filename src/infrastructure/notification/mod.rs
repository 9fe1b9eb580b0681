//! Outbound notifications for activation and password-reset tokens
//!
//! Delivery is an external concern; callers treat sends as fire-and-forget.
//! A failed send is logged and never rolls back the state transition that
//! already committed.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::{DomainError, User};

/// Trait for out-of-band delivery of plaintext tokens
#[async_trait]
pub trait NotificationSender: Send + Sync + Debug {
    /// Deliver an account-activation message carrying the plaintext token
    async fn send_activation(&self, user: &User, token: &str) -> Result<(), DomainError>;

    /// Deliver a password-reset message carrying the plaintext token
    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), DomainError>;
}

/// Sender that logs instead of delivering. Used in development and tests;
/// a real mailer slots in behind the same trait.
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationSender;

impl TracingNotificationSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for TracingNotificationSender {
    async fn send_activation(&self, user: &User, token: &str) -> Result<(), DomainError> {
        tracing::info!(
            user_id = user.id().value(),
            email = user.email(),
            token,
            "account activation notification"
        );
        Ok(())
    }

    async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), DomainError> {
        tracing::info!(
            user_id = user.id().value(),
            email = user.email(),
            token,
            "password reset notification"
        );
        Ok(())
    }
}
