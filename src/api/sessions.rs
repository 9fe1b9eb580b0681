//! Sessions API endpoints: login and logout

use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde::{Deserialize, Serialize};

use super::middleware::CurrentUser;
use super::state::AppState;
use super::types::{ApiError, Json};
use super::users::UserResponse;

/// Create the sessions router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create).delete(destroy))
}

fn default_remember_me() -> bool {
    true
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
    #[serde(default = "default_remember_me")]
    pub remember_me: bool,
}

/// Login response. When remember-me is on, `remember_token` is the
/// plaintext client credential; only its digest is stored.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_token: Option<String>,
}

/// Log in with email and password
///
/// POST /sessions
///
/// Unknown email, wrong password and unactivated account all get the
/// same answer.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&body.email, &body.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email/password combination"))?;

    let remember_token = if body.remember_me {
        Some(state.user_service.remember(user.id()).await?)
    } else {
        None
    };

    Ok(Json(LoginResponse {
        user: UserResponse::from_user(&user),
        remember_token,
    }))
}

/// Log out: forget the remember credential
///
/// DELETE /sessions
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.user_service.forget(actor.id()).await?;

    Ok(StatusCode::NO_CONTENT)
}
