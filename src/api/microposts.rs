//! Microposts API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::middleware::CurrentUser;
use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::micropost::{ImageAttachment, Micropost, MicropostId};
use crate::domain::user::UserId;
use crate::infrastructure::CreateMicropostRequest;

/// Create the microposts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", delete(destroy))
}

/// Micropost creation request
#[derive(Debug, Deserialize)]
pub struct CreateMicropostBody {
    pub content: String,
    #[serde(default)]
    pub image: Option<ImageBody>,
}

/// Image metadata accompanying a post
#[derive(Debug, Deserialize)]
pub struct ImageBody {
    pub filename: String,
    pub content_type: String,
    pub byte_size: u64,
}

/// Micropost response
#[derive(Debug, Serialize)]
pub struct MicropostResponse {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
    pub created_at: String,
}

impl MicropostResponse {
    pub fn from_micropost(post: &Micropost) -> Self {
        Self {
            id: post.id().value(),
            user_id: post.user_id().value(),
            content: post.content().to_string(),
            image_filename: post.image().map(|i| i.filename.clone()),
            created_at: post.created_at().to_rfc3339(),
        }
    }
}

/// Create a micropost owned by the current user
///
/// POST /microposts
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateMicropostBody>,
) -> Result<(StatusCode, Json<MicropostResponse>), ApiError> {
    let post = state
        .micropost_service
        .create(
            actor.id(),
            CreateMicropostRequest {
                content: body.content,
                image: body.image.map(|i| ImageAttachment {
                    filename: i.filename,
                    content_type: i.content_type,
                    byte_size: i.byte_size,
                }),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MicropostResponse::from_micropost(&post))))
}

/// Destroy one of the current user's posts
///
/// DELETE /microposts/{id}
///
/// A post owned by someone else is reported as not found, the same as an
/// unknown id.
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .micropost_service
        .destroy(actor.id(), MicropostId::new(id))
        .await?;

    if !deleted {
        return Err(ApiError::not_found(format!("Micropost '{}' not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Feed query parameters: followee ids as a comma-separated list. The
/// follow relationship itself lives outside this service, so the caller
/// supplies the set.
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub following: Option<String>,
}

/// The current user's feed: own posts plus followees', newest first
///
/// GET /feed?following=2,3
pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<MicropostResponse>>, ApiError> {
    let followees = parse_followees(params.following.as_deref())
        .map_err(|_| ApiError::bad_request("'following' must be a comma-separated list of ids"))?;

    let posts = state.micropost_service.feed(actor.id(), followees).await?;

    Ok(Json(posts.iter().map(MicropostResponse::from_micropost).collect()))
}

fn parse_followees(raw: Option<&str>) -> Result<Vec<UserId>, std::num::ParseIntError> {
    match raw {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => raw
            .split(',')
            .map(|part| part.trim().parse::<i64>().map(UserId::new))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_followees() {
        let ids = parse_followees(Some("2,3, 5")).unwrap();
        let values: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        assert_eq!(values, vec![2, 3, 5]);
    }

    #[test]
    fn test_parse_followees_empty() {
        assert!(parse_followees(None).unwrap().is_empty());
        assert!(parse_followees(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_followees_rejects_garbage() {
        assert!(parse_followees(Some("2,abc")).is_err());
    }
}
