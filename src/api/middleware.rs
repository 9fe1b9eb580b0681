//! Request authentication
//!
//! Clients present `Authorization: Bearer <user_id>:<remember_token>`,
//! the credential handed out at login with remember-me. The extractor
//! resolves it to a `User` and hands the identity to the handler
//! explicitly; nothing downstream reads ambient request state.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;

use super::state::AppState;
use super::types::ApiError;
use crate::domain::auth::TokenPurpose;
use crate::domain::user::User;

/// Extractor that requires an authenticated, activated user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthenticated = || ApiError::unauthorized("Please log in");

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(unauthenticated)?;

        let credential = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(unauthenticated)?;

        let (user_id, token) = parse_credential(credential).ok_or_else(unauthenticated)?;

        // A malformed or stale credential reads the same as a missing one
        let user = state
            .user_service
            .get(user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(unauthenticated)?;

        if !user.is_activated() {
            return Err(unauthenticated());
        }

        if !state
            .user_service
            .verify_token(&user, TokenPurpose::Remember, token, Utc::now())
        {
            return Err(unauthenticated());
        }

        Ok(CurrentUser(user))
    }
}

fn parse_credential(credential: &str) -> Option<(crate::domain::user::UserId, &str)> {
    let (id, token) = credential.split_once(':')?;
    let id: i64 = id.parse().ok()?;

    Some((crate::domain::user::UserId::new(id), token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credential() {
        let (id, token) = parse_credential("42:abc_def-123").unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(token, "abc_def-123");
    }

    #[test]
    fn test_parse_credential_rejects_malformed_input() {
        assert!(parse_credential("no-separator").is_none());
        assert!(parse_credential("notanumber:token").is_none());
        assert!(parse_credential("").is_none());
    }
}
