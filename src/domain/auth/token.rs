//! Token slots: the persisted side of remember/activation/reset tokens

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What a token is for. The purpose decides the expiry rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Long-lived session credential, cleared by an explicit forget.
    Remember,
    /// One-shot account activation, assigned at registration.
    Activation,
    /// Password reset, valid for a fixed window after issuance.
    PasswordReset,
}

impl TokenPurpose {
    /// Time window during which a token of this purpose is accepted.
    /// `None` means the token never expires on its own.
    pub fn expiry_window(&self) -> Option<Duration> {
        match self {
            Self::Remember | Self::Activation => None,
            Self::PasswordReset => Some(Duration::hours(2)),
        }
    }
}

/// A stored token credential: the digest of a random token plus when it
/// was issued. The plaintext is shown to the user once and never kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSlot {
    purpose: TokenPurpose,
    digest: String,
    issued_at: DateTime<Utc>,
}

impl TokenSlot {
    pub fn new(purpose: TokenPurpose, digest: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            purpose,
            digest: digest.into(),
            issued_at,
        }
    }

    pub fn purpose(&self) -> TokenPurpose {
        self.purpose
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Whether this slot has outlived its purpose's window at `now`.
    /// Expiry is time-based only; a matching digest does not rescue an
    /// expired token.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.purpose.expiry_window() {
            Some(window) => now - self.issued_at > window,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_and_activation_never_expire() {
        let issued = Utc::now() - Duration::days(365);
        let remember = TokenSlot::new(TokenPurpose::Remember, "digest", issued);
        let activation = TokenSlot::new(TokenPurpose::Activation, "digest", issued);

        assert!(!remember.is_expired(Utc::now()));
        assert!(!activation.is_expired(Utc::now()));
    }

    #[test]
    fn test_reset_expires_after_two_hours() {
        let issued = Utc::now();
        let slot = TokenSlot::new(TokenPurpose::PasswordReset, "digest", issued);

        assert!(!slot.is_expired(issued + Duration::minutes(119)));
        assert!(!slot.is_expired(issued + Duration::hours(2)));
        assert!(slot.is_expired(issued + Duration::hours(2) + Duration::seconds(1)));
    }
}
