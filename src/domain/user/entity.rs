//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::auth::{TokenPurpose, TokenSlot};

/// User identifier, assigned by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user record not yet persisted.
///
/// The activation slot is part of construction: a `NewUser` cannot exist
/// without one, so a persisted user always carries an activation digest.
#[derive(Debug, Clone)]
pub struct NewUser {
    name: String,
    email: String,
    phone_number: String,
    password_digest: String,
    activation: TokenSlot,
    admin: bool,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        password_digest: impl Into<String>,
        activation: TokenSlot,
    ) -> Self {
        Self {
            name: name.into(),
            // Emails are stored lower-cased; uniqueness is case-insensitive.
            email: email.into().to_lowercase(),
            phone_number: phone_number.into(),
            password_digest: password_digest.into(),
            activation,
            admin: false,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn activation(&self) -> &TokenSlot {
        &self.activation
    }

    pub fn admin(&self) -> bool {
        self.admin
    }

    /// Materialize the persisted record once the storage layer has
    /// assigned an id.
    pub fn into_user(self, id: UserId) -> User {
        let now = Utc::now();

        User {
            id,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            password_digest: self.password_digest,
            admin: self.admin,
            activated: false,
            activated_at: None,
            activation: self.activation,
            remember: None,
            reset: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    /// Always lower-cased
    email: String,
    phone_number: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_digest: String,
    admin: bool,
    activated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    activated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    activation: TokenSlot,
    #[serde(skip_serializing)]
    remember: Option<TokenSlot>,
    #[serde(skip_serializing)]
    reset: Option<TokenSlot>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Rebuild a user from stored columns. Used by repositories.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        name: String,
        email: String,
        phone_number: String,
        password_digest: String,
        admin: bool,
        activated: bool,
        activated_at: Option<DateTime<Utc>>,
        activation: TokenSlot,
        remember: Option<TokenSlot>,
        reset: Option<TokenSlot>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone_number,
            password_digest,
            admin,
            activated,
            activated_at,
            activation,
            remember,
            reset,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    pub fn activation(&self) -> &TokenSlot {
        &self.activation
    }

    pub fn remember_slot(&self) -> Option<&TokenSlot> {
        self.remember.as_ref()
    }

    pub fn reset_slot(&self) -> Option<&TokenSlot> {
        self.reset.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The stored slot for a token purpose, if any. Activation is always
    /// present; remember and reset only while their flow is live.
    pub fn token_slot(&self, purpose: TokenPurpose) -> Option<&TokenSlot> {
        match purpose {
            TokenPurpose::Activation => Some(&self.activation),
            TokenPurpose::Remember => self.remember.as_ref(),
            TokenPurpose::PasswordReset => self.reset.as_ref(),
        }
    }

    // Mutators

    /// Update the profile fields. The email is lower-cased on the way in.
    pub fn set_profile(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) {
        self.name = name.into();
        self.email = email.into().to_lowercase();
        self.phone_number = phone_number.into();
        self.touch();
    }

    pub fn set_password_digest(&mut self, digest: impl Into<String>) {
        self.password_digest = digest.into();
        self.touch();
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
        self.touch();
    }

    /// Mark the account activated.
    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.activated = true;
        self.activated_at = Some(now);
        self.touch();
    }

    /// Store a new remember credential, replacing any existing one.
    pub fn remember(&mut self, slot: TokenSlot) {
        self.remember = Some(slot);
        self.touch();
    }

    /// Clear the remember credential. Idempotent: forgetting an already
    /// forgotten user is a no-op, not an error.
    pub fn forget(&mut self) {
        self.remember = None;
        self.touch();
    }

    /// Store a new reset credential. A pending reset is overwritten;
    /// last writer wins on this slot.
    pub fn set_reset(&mut self, slot: TokenSlot) {
        self.reset = Some(slot);
        self.touch();
    }

    /// Invalidate the reset credential after use.
    pub fn clear_reset(&mut self) {
        self.reset = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activation_slot() -> TokenSlot {
        TokenSlot::new(TokenPurpose::Activation, "activation_digest", Utc::now())
    }

    fn create_test_user(id: i64, email: &str) -> User {
        NewUser::new("Example User", email, "0123456789", "digest", activation_slot())
            .into_user(UserId::new(id))
    }

    #[test]
    fn test_email_lowercased_on_construction() {
        let user = create_test_user(1, "Foo@Bar.COM");
        assert_eq!(user.email(), "foo@bar.com");
    }

    #[test]
    fn test_email_lowercased_on_profile_update() {
        let mut user = create_test_user(1, "a@b.com");
        user.set_profile("Example User", "New@Example.ORG", "0123456789");
        assert_eq!(user.email(), "new@example.org");
    }

    #[test]
    fn test_new_user_always_has_activation_digest() {
        let user = create_test_user(1, "a@b.com");
        assert_eq!(user.activation().digest(), "activation_digest");
        assert!(!user.is_activated());
        assert!(user.activated_at().is_none());
    }

    #[test]
    fn test_activate() {
        let mut user = create_test_user(1, "a@b.com");
        let now = Utc::now();

        user.activate(now);
        assert!(user.is_activated());
        assert_eq!(user.activated_at(), Some(now));
    }

    #[test]
    fn test_forget_is_idempotent() {
        let mut user = create_test_user(1, "a@b.com");

        user.remember(TokenSlot::new(TokenPurpose::Remember, "d", Utc::now()));
        assert!(user.remember_slot().is_some());

        user.forget();
        assert!(user.remember_slot().is_none());

        user.forget();
        assert!(user.remember_slot().is_none());
    }

    #[test]
    fn test_reset_slot_overwritten_by_new_request() {
        let mut user = create_test_user(1, "a@b.com");

        user.set_reset(TokenSlot::new(TokenPurpose::PasswordReset, "first", Utc::now()));
        user.set_reset(TokenSlot::new(TokenPurpose::PasswordReset, "second", Utc::now()));

        assert_eq!(user.reset_slot().unwrap().digest(), "second");
    }

    #[test]
    fn test_token_slot_lookup() {
        let mut user = create_test_user(1, "a@b.com");

        assert!(user.token_slot(TokenPurpose::Activation).is_some());
        assert!(user.token_slot(TokenPurpose::Remember).is_none());
        assert!(user.token_slot(TokenPurpose::PasswordReset).is_none());

        user.remember(TokenSlot::new(TokenPurpose::Remember, "d", Utc::now()));
        assert!(user.token_slot(TokenPurpose::Remember).is_some());
    }

    #[test]
    fn test_serialization_excludes_digests() {
        let user = create_test_user(1, "a@b.com");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("digest"));
        assert!(!json.contains("password"));
    }
}
