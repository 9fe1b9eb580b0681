//! User service: registration, authentication, and the three token flows

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::{TokenPurpose, TokenSlot};
use crate::domain::micropost::MicropostRepository;
use crate::domain::user::{
    validate_email, validate_name, validate_phone_number, validate_password,
    validate_registration, NewUser, User, UserId, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::auth::{generate_token, SecretHasher};
use crate::infrastructure::notification::NotificationSender;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Request for updating a user's profile
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// User service
///
/// Token regeneration has no transactional guard: two concurrent requests
/// racing on the same slot resolve as last-writer-wins on the digest
/// column. Tokens are single-user and low-frequency, so this is accepted.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    microposts: Arc<dyn MicropostRepository>,
    hasher: Arc<dyn SecretHasher>,
    notifier: Arc<dyn NotificationSender>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        microposts: Arc<dyn MicropostRepository>,
        hasher: Arc<dyn SecretHasher>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            users,
            microposts,
            hasher,
            notifier,
        }
    }

    /// Register a new user.
    ///
    /// The activation digest is computed here, before the record is
    /// handed to storage; a user without one cannot be constructed. The
    /// plaintext activation token goes out through the notifier only.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        validate_registration(
            &request.name,
            &request.email,
            &request.phone_number,
            &request.password,
            &request.password_confirmation,
        )
        .map_err(|errors| {
            DomainError::validation_errors(errors.iter().map(|e| e.to_string()).collect())
        })?;

        if self.users.email_exists(&request.email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already taken",
                request.email.to_lowercase()
            )));
        }

        let password_digest = self.hasher.hash(&request.password)?;

        let activation_token = generate_token();
        let activation = TokenSlot::new(
            TokenPurpose::Activation,
            self.hasher.hash(&activation_token)?,
            Utc::now(),
        );

        let new_user = NewUser::new(
            request.name,
            request.email,
            request.phone_number,
            password_digest,
            activation,
        );

        let user = self.users.insert(new_user).await?;

        self.notify_activation(&user, &activation_token).await;

        Ok(user)
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email, wrong password and unactivated account all come back
    /// as `None`; the caller gets a boolean outcome, never a fault.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            return Ok(None);
        };

        if !user.is_activated() {
            return Ok(None);
        }

        if !self.hasher.verify(Some(user.password_digest()), password) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Check a plaintext token against a user's stored slot for a purpose.
    ///
    /// False when no slot is stored, when the digest does not match, or
    /// when the slot has expired at `now` - the three cases are not
    /// distinguished.
    pub fn verify_token(
        &self,
        user: &User,
        purpose: TokenPurpose,
        token: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(slot) = user.token_slot(purpose) else {
            return false;
        };

        if slot.is_expired(now) {
            return false;
        }

        self.hasher.verify(Some(slot.digest()), token)
    }

    /// Issue a remember token, persist its digest, and hand back the
    /// plaintext for the client-side credential.
    pub async fn remember(&self, user_id: UserId) -> Result<String, DomainError> {
        let mut user = self.get_required(user_id).await?;

        let token = generate_token();
        let slot = TokenSlot::new(TokenPurpose::Remember, self.hasher.hash(&token)?, Utc::now());

        user.remember(slot);
        self.users.update(&user).await?;

        Ok(token)
    }

    /// Clear the remember digest. Idempotent: an already-forgotten or even
    /// deleted user forgets without error.
    pub async fn forget(&self, user_id: UserId) -> Result<(), DomainError> {
        let Some(mut user) = self.users.get(user_id).await? else {
            return Ok(());
        };

        user.forget();
        self.users.update(&user).await?;

        Ok(())
    }

    /// Activate the account identified by `email` with an activation token.
    ///
    /// Returns the activated user, or `None` when the email is unknown,
    /// the account is already activated, or the token does not match.
    pub async fn activate(&self, email: &str, token: &str) -> Result<Option<User>, DomainError> {
        let Some(mut user) = self.users.get_by_email(email).await? else {
            return Ok(None);
        };

        if user.is_activated() {
            return Ok(None);
        }

        if !self.verify_token(&user, TokenPurpose::Activation, token, Utc::now()) {
            return Ok(None);
        }

        user.activate(Utc::now());
        let user = self.users.update(&user).await?;

        Ok(Some(user))
    }

    /// Start a password reset: issue a token, overwrite any pending reset
    /// slot, and notify. Unknown or unactivated emails are silently
    /// ignored so the endpoint does not reveal which emails exist.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let Some(mut user) = self.users.get_by_email(email).await? else {
            return Ok(());
        };

        if !user.is_activated() {
            return Ok(());
        }

        let token = generate_token();
        let slot = TokenSlot::new(
            TokenPurpose::PasswordReset,
            self.hasher.hash(&token)?,
            Utc::now(),
        );

        user.set_reset(slot);
        let user = self.users.update(&user).await?;

        self.notify_password_reset(&user, &token).await;

        Ok(())
    }

    /// Complete a password reset.
    ///
    /// Returns the updated user on success. `None` covers unknown email,
    /// missing slot, digest mismatch and the elapsed two-hour window
    /// alike; an expired token is reported exactly like an invalid one.
    /// The reset digest is invalidated once the new password is written.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        let Some(mut user) = self.users.get_by_email(email).await? else {
            return Ok(None);
        };

        if !self.verify_token(&user, TokenPurpose::PasswordReset, token, now) {
            return Ok(None);
        }

        validate_password(new_password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        user.set_password_digest(self.hasher.hash(new_password)?);
        user.clear_reset();
        let user = self.users.update(&user).await?;

        Ok(Some(user))
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: UserId) -> Result<Option<User>, DomainError> {
        self.users.get(user_id).await
    }

    /// List activated users
    pub async fn list_activated(&self) -> Result<Vec<User>, DomainError> {
        self.users.list_activated().await
    }

    /// Update a user's profile fields
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut errors = Vec::new();
        if let Err(e) = validate_name(&request.name) {
            errors.push(e.to_string());
        }
        if let Err(e) = validate_email(&request.email) {
            errors.push(e.to_string());
        }
        if let Err(e) = validate_phone_number(&request.phone_number) {
            errors.push(e.to_string());
        }
        if !errors.is_empty() {
            return Err(DomainError::validation_errors(errors));
        }

        let mut user = self.get_required(user_id).await?;
        user.set_profile(request.name, request.email, request.phone_number);

        self.users.update(&user).await
    }

    /// Delete a user and cascade to their microposts.
    pub async fn delete(&self, user_id: UserId) -> Result<bool, DomainError> {
        let removed = self.microposts.delete_by_owner(user_id).await?;
        let deleted = self.users.delete(user_id).await?;

        if deleted {
            tracing::info!(user_id = user_id.value(), posts_removed = removed, "user deleted");
        }

        Ok(deleted)
    }

    async fn get_required(&self, user_id: UserId) -> Result<User, DomainError> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", user_id)))
    }

    // Notification sends are fire-and-forget: the state transition has
    // already committed, a delivery failure only gets logged.

    async fn notify_activation(&self, user: &User, token: &str) {
        if let Err(e) = self.notifier.send_activation(user, token).await {
            tracing::warn!(
                user_id = user.id().value(),
                error = %e,
                "failed to send activation notification"
            );
        }
    }

    async fn notify_password_reset(&self, user: &User, token: &str) {
        if let Err(e) = self.notifier.send_password_reset(user, token).await {
            tracing::warn!(
                user_id = user.id().value(),
                error = %e,
                "failed to send password reset notification"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::{Argon2Hasher, HasherCost};
    use crate::infrastructure::micropost::InMemoryMicropostRepository;
    use crate::infrastructure::user::InMemoryUserRepository;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    /// Captures outbound notifications so tests can read the plaintext
    /// tokens the way a user would from their inbox.
    #[derive(Debug, Default)]
    struct RecordingSender {
        activations: Mutex<Vec<(i64, String)>>,
        resets: Mutex<Vec<(i64, String)>>,
    }

    impl RecordingSender {
        fn last_activation_token(&self) -> Option<String> {
            self.activations
                .lock()
                .unwrap()
                .last()
                .map(|(_, t)| t.clone())
        }

        fn last_reset_token(&self) -> Option<String> {
            self.resets.lock().unwrap().last().map(|(_, t)| t.clone())
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send_activation(&self, user: &User, token: &str) -> Result<(), DomainError> {
            self.activations
                .lock()
                .unwrap()
                .push((user.id().value(), token.to_string()));
            Ok(())
        }

        async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), DomainError> {
            self.resets
                .lock()
                .unwrap()
                .push((user.id().value(), token.to_string()));
            Ok(())
        }
    }

    /// Sender whose deliveries always fail, for the fire-and-forget test.
    #[derive(Debug, Default)]
    struct FailingSender;

    #[async_trait]
    impl NotificationSender for FailingSender {
        async fn send_activation(&self, _user: &User, _token: &str) -> Result<(), DomainError> {
            Err(DomainError::internal("smtp down"))
        }

        async fn send_password_reset(&self, _user: &User, _token: &str) -> Result<(), DomainError> {
            Err(DomainError::internal("smtp down"))
        }
    }

    struct Fixture {
        service: UserService,
        sender: Arc<RecordingSender>,
        microposts: Arc<InMemoryMicropostRepository>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let microposts = Arc::new(InMemoryMicropostRepository::new());
        let sender = Arc::new(RecordingSender::default());
        let service = UserService::new(
            users,
            microposts.clone(),
            Arc::new(Argon2Hasher::new(HasherCost::fast())),
            sender.clone(),
        );

        Fixture {
            service,
            sender,
            microposts,
        }
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Example User".to_string(),
            email: email.to_string(),
            phone_number: "0123456789".to_string(),
            password: "foobar".to_string(),
            password_confirmation: "foobar".to_string(),
        }
    }

    async fn registered_and_activated(f: &Fixture, email: &str) -> User {
        let user = f.service.register(register_request(email)).await.unwrap();
        let token = f.sender.last_activation_token().unwrap();
        f.service
            .activate(user.email(), &token)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_persists_lowercased_email() {
        let f = fixture();

        let user = f.service.register(register_request("Foo@Bar.com")).await.unwrap();

        assert_eq!(user.email(), "foo@bar.com");
        let reloaded = f.service.get(user.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.email(), "foo@bar.com");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields_with_message_list() {
        let f = fixture();

        let request = RegisterRequest {
            name: String::new(),
            email: "nonsense".to_string(),
            phone_number: "12".to_string(),
            password: "foo".to_string(),
            password_confirmation: "bar".to_string(),
        };

        match f.service.register(request).await {
            Err(DomainError::Validation { errors }) => assert!(errors.len() >= 4),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let f = fixture();

        f.service.register(register_request("user@example.com")).await.unwrap();
        let result = f.service.register(register_request("USER@example.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_activation_flow() {
        let f = fixture();

        let user = f.service.register(register_request("user@example.com")).await.unwrap();
        assert!(!user.is_activated());

        let token = f.sender.last_activation_token().unwrap();
        let activated = f.service.activate("user@example.com", &token).await.unwrap();

        let activated = activated.unwrap();
        assert!(activated.is_activated());
        assert!(activated.activated_at().is_some());
    }

    #[tokio::test]
    async fn test_activation_rejects_wrong_token_and_second_use() {
        let f = fixture();

        f.service.register(register_request("user@example.com")).await.unwrap();
        let token = f.sender.last_activation_token().unwrap();

        assert!(f
            .service
            .activate("user@example.com", "wrong-token")
            .await
            .unwrap()
            .is_none());

        assert!(f.service.activate("user@example.com", &token).await.unwrap().is_some());
        // Already activated: the same token no longer activates
        assert!(f.service.activate("user@example.com", &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_requires_activation_and_password() {
        let f = fixture();

        f.service.register(register_request("user@example.com")).await.unwrap();

        // Not yet activated
        assert!(f
            .service
            .authenticate("user@example.com", "foobar")
            .await
            .unwrap()
            .is_none());

        let token = f.sender.last_activation_token().unwrap();
        f.service.activate("user@example.com", &token).await.unwrap();

        assert!(f
            .service
            .authenticate("user@example.com", "foobar")
            .await
            .unwrap()
            .is_some());
        assert!(f
            .service
            .authenticate("user@example.com", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(f
            .service
            .authenticate("ghost@example.com", "foobar")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_remember_and_verify() {
        let f = fixture();
        let user = registered_and_activated(&f, "user@example.com").await;

        let token = f.service.remember(user.id()).await.unwrap();
        let user = f.service.get(user.id()).await.unwrap().unwrap();

        assert!(f.service.verify_token(&user, TokenPurpose::Remember, &token, Utc::now()));
        assert!(!f.service.verify_token(&user, TokenPurpose::Remember, "bogus", Utc::now()));
    }

    #[tokio::test]
    async fn test_forget_twice_is_a_noop() {
        let f = fixture();
        let user = registered_and_activated(&f, "user@example.com").await;

        f.service.remember(user.id()).await.unwrap();

        f.service.forget(user.id()).await.unwrap();
        let reloaded = f.service.get(user.id()).await.unwrap().unwrap();
        assert!(reloaded.remember_slot().is_none());

        f.service.forget(user.id()).await.unwrap();
        let reloaded = f.service.get(user.id()).await.unwrap().unwrap();
        assert!(reloaded.remember_slot().is_none());
    }

    #[tokio::test]
    async fn test_verify_token_without_slot_is_false() {
        let f = fixture();
        let user = registered_and_activated(&f, "user@example.com").await;

        assert!(!f.service.verify_token(&user, TokenPurpose::Remember, "anything", Utc::now()));
        assert!(!f.service.verify_token(
            &user,
            TokenPurpose::PasswordReset,
            "anything",
            Utc::now()
        ));
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let f = fixture();
        let user = registered_and_activated(&f, "user@example.com").await;

        f.service.request_password_reset("user@example.com").await.unwrap();
        let token = f.sender.last_reset_token().unwrap();

        let updated = f
            .service
            .reset_password("user@example.com", &token, "newpassword", Utc::now())
            .await
            .unwrap();
        assert!(updated.is_some());

        // New password works, old one does not
        assert!(f
            .service
            .authenticate("user@example.com", "newpassword")
            .await
            .unwrap()
            .is_some());
        assert!(f
            .service
            .authenticate("user@example.com", "foobar")
            .await
            .unwrap()
            .is_none());

        // Slot was invalidated after use: the same token is dead
        let result = f
            .service
            .reset_password("user@example.com", &token, "anotherpass", Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());

        let reloaded = f.service.get(user.id()).await.unwrap().unwrap();
        assert!(reloaded.reset_slot().is_none());
    }

    #[tokio::test]
    async fn test_password_reset_token_expires_after_two_hours() {
        let f = fixture();
        registered_and_activated(&f, "user@example.com").await;

        f.service.request_password_reset("user@example.com").await.unwrap();
        let token = f.sender.last_reset_token().unwrap();

        // Within the window it succeeds; past it the matching digest no
        // longer helps.
        let later = Utc::now() + Duration::hours(2) + Duration::minutes(1);
        let result = f
            .service
            .reset_password("user@example.com", &token, "newpassword", later)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_password_reset_rerequest_invalidates_prior_token() {
        let f = fixture();
        registered_and_activated(&f, "user@example.com").await;

        f.service.request_password_reset("user@example.com").await.unwrap();
        let first = f.sender.last_reset_token().unwrap();

        f.service.request_password_reset("user@example.com").await.unwrap();
        let second = f.sender.last_reset_token().unwrap();

        assert!(f
            .service
            .reset_password("user@example.com", &first, "newpassword", Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(f
            .service
            .reset_password("user@example.com", &second, "newpassword", Utc::now())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_reset_request_for_unknown_email_is_silent() {
        let f = fixture();

        f.service.request_password_reset("ghost@example.com").await.unwrap();
        assert!(f.sender.last_reset_token().is_none());
    }

    #[tokio::test]
    async fn test_registration_survives_notification_failure() {
        let users = Arc::new(InMemoryUserRepository::new());
        let microposts = Arc::new(InMemoryMicropostRepository::new());
        let service = UserService::new(
            users,
            microposts,
            Arc::new(Argon2Hasher::new(HasherCost::fast())),
            Arc::new(FailingSender),
        );

        // The send fails but the committed registration stands
        let user = service.register(register_request("user@example.com")).await.unwrap();
        assert!(service.get(user.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_profile_lowercases_email() {
        let f = fixture();
        let user = registered_and_activated(&f, "user@example.com").await;

        let updated = f
            .service
            .update_profile(
                user.id(),
                UpdateProfileRequest {
                    name: "New Name".to_string(),
                    email: "New@Example.COM".to_string(),
                    phone_number: "0123456789".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "New Name");
        assert_eq!(updated.email(), "new@example.com");
    }

    #[tokio::test]
    async fn test_delete_cascades_to_microposts() {
        use crate::domain::micropost::NewMicropost;
        use crate::domain::FeedQuery;

        let f = fixture();
        let user = registered_and_activated(&f, "user@example.com").await;

        for i in 0..3 {
            f.microposts
                .insert(NewMicropost::new(user.id(), format!("post {i}"), None))
                .await
                .unwrap();
        }

        assert!(f.service.delete(user.id()).await.unwrap());

        let remaining = f
            .microposts
            .feed(&FeedQuery::for_user(user.id(), []))
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }
}
