//! Password reset endpoints

use axum::{extract::State, routing::post, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::types::{ApiError, Json};
use super::users::UserResponse;

/// Create the password resets router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create).patch(update))
}

/// Reset request body
#[derive(Debug, Deserialize)]
pub struct RequestResetBody {
    pub email: String,
}

/// Reset completion body
#[derive(Debug, Deserialize)]
pub struct CompleteResetBody {
    pub email: String,
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct ResetRequestedResponse {
    pub message: String,
}

/// Request a password reset
///
/// POST /password_resets
///
/// Always answers the same whether or not the email exists.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<RequestResetBody>,
) -> Result<Json<ResetRequestedResponse>, ApiError> {
    state.user_service.request_password_reset(&body.email).await?;

    Ok(Json(ResetRequestedResponse {
        message: "If that email exists, reset instructions have been sent".to_string(),
    }))
}

/// Complete a password reset
///
/// PATCH /password_resets
///
/// An expired token gets the identical answer to an invalid one; the
/// window is not observable from the outside.
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<CompleteResetBody>,
) -> Result<Json<UserResponse>, ApiError> {
    if body.password != body.password_confirmation {
        return Err(ApiError::validation(vec![
            "Password confirmation does not match".to_string(),
        ]));
    }

    let user = state
        .user_service
        .reset_password(&body.email, &body.token, &body.password, Utc::now())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Password reset token is invalid"))?;

    Ok(Json(UserResponse::from_user(&user)))
}
