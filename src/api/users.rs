//! Users API endpoints
//!
//! Registration is open; everything else is gated. Profile edits require
//! acting on oneself, destruction requires the admin flag, and a failed
//! gate check routes to the safe default rather than explaining itself.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use super::microposts::MicropostResponse;
use super::middleware::CurrentUser;
use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::auth::{permits, Gate};
use crate::domain::user::{User, UserId};
use crate::infrastructure::{RegisterRequest, UpdateProfileRequest};

/// Create the users router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).patch(update).delete(destroy))
}

/// User creation request
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Profile update request
#[derive(Debug, Deserialize)]
pub struct UpdateUserBody {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub activated: bool,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().value(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            admin: user.is_admin(),
            activated: user.is_activated(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// User detail response: the profile plus the user's own posts
#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub microposts: Vec<MicropostResponse>,
}

/// List activated users
///
/// GET /users
pub async fn index(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_service.list_activated().await?;

    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}

/// Register a new user
///
/// POST /users
///
/// On success the account exists unactivated; the activation token goes
/// out via the notification sender.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            phone_number: body.phone_number,
            password: body.password,
            password_confirmation: body.password_confirmation,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Show a user and their posts
///
/// GET /users/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    let user_id = UserId::new(id);

    let user = state
        .user_service
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", id)))?;

    let microposts = state.micropost_service.list_by_owner(user_id).await?;

    Ok(Json(UserDetailResponse {
        user: UserResponse::from_user(&user),
        microposts: microposts.iter().map(MicropostResponse::from_micropost).collect(),
    }))
}

/// Update a user's profile
///
/// PATCH /users/{id}
///
/// Only the user themselves may edit; admin does not bypass this.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserResponse>, ApiError> {
    let target = UserId::new(id);

    if !permits(&actor, Gate::EditProfile { target }) {
        return Err(ApiError::redirect_home());
    }

    let user = state
        .user_service
        .update_profile(
            target,
            UpdateProfileRequest {
                name: body.name,
                email: body.email,
                phone_number: body.phone_number,
            },
        )
        .await?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// Destroy a user, cascading to their posts
///
/// DELETE /users/{id}
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !permits(&actor, Gate::DestroyUser) {
        return Err(ApiError::redirect_home());
    }

    let deleted = state.user_service.delete(UserId::new(id)).await?;

    if !deleted {
        return Err(ApiError::not_found(format!("User '{}' not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
