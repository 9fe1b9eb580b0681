//! Account activation endpoint

use axum::{extract::State, routing::patch, Router};
use serde::Deserialize;

use super::state::AppState;
use super::types::{ApiError, Json};
use super::users::UserResponse;

/// Create the account activations router
pub fn router() -> Router<AppState> {
    Router::new().route("/", patch(update))
}

/// Activation request: the email plus the plaintext token from the
/// activation notification
#[derive(Debug, Deserialize)]
pub struct ActivationBody {
    pub email: String,
    pub token: String,
}

/// Activate an account
///
/// PATCH /account_activations
///
/// Unknown email, already-activated account and wrong token all route to
/// the safe default without saying which it was.
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<ActivationBody>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .activate(&body.email, &body.token)
        .await?
        .ok_or_else(ApiError::redirect_home)?;

    Ok(Json(UserResponse::from_user(&user)))
}
