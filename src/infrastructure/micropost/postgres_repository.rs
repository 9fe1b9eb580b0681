//! PostgreSQL micropost repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::feed::FeedQuery;
use crate::domain::micropost::{
    ImageAttachment, Micropost, MicropostId, MicropostRepository, NewMicropost,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

const POST_COLUMNS: &str =
    "id, user_id, content, image_filename, image_content_type, image_byte_size, created_at";

/// PostgreSQL implementation of MicropostRepository
#[derive(Debug, Clone)]
pub struct PostgresMicropostRepository {
    pool: PgPool,
}

impl PostgresMicropostRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MicropostRepository for PostgresMicropostRepository {
    async fn insert(&self, new_post: NewMicropost) -> Result<Micropost, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO microposts (user_id, content, image_filename,
                                    image_content_type, image_byte_size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(new_post.user_id().value())
        .bind(new_post.content())
        .bind(new_post.image().map(|i| i.filename.clone()))
        .bind(new_post.image().map(|i| i.content_type.clone()))
        .bind(new_post.image().map(|i| i.byte_size as i64))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert micropost: {}", e)))?;

        row_to_micropost(&row)
    }

    async fn delete_owned(&self, id: MicropostId, owner: UserId) -> Result<bool, DomainError> {
        // Scoping to the owner keeps foreign posts indistinguishable
        // from missing ones.
        let result = sqlx::query("DELETE FROM microposts WHERE id = $1 AND user_id = $2")
            .bind(id.value())
            .bind(owner.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete micropost: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(&self, owner: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM microposts WHERE user_id = $1")
            .bind(owner.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete microposts: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Micropost>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM microposts WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list microposts: {}", e)))?;

        rows.iter().map(row_to_micropost).collect()
    }

    async fn feed(&self, query: &FeedQuery) -> Result<Vec<Micropost>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM microposts WHERE user_id = ANY($1) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(query.owner_ids())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to query feed: {}", e)))?;

        rows.iter().map(row_to_micropost).collect()
    }
}

fn row_to_micropost(row: &PgRow) -> Result<Micropost, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Failed to read micropost row: {}", e));

    let image = match (
        row.try_get::<Option<String>, _>("image_filename").map_err(read)?,
        row.try_get::<Option<String>, _>("image_content_type").map_err(read)?,
        row.try_get::<Option<i64>, _>("image_byte_size").map_err(read)?,
    ) {
        (Some(filename), Some(content_type), Some(byte_size)) => Some(ImageAttachment {
            filename,
            content_type,
            byte_size: byte_size as u64,
        }),
        _ => None,
    };

    Ok(Micropost::from_parts(
        MicropostId::new(row.try_get("id").map_err(read)?),
        UserId::new(row.try_get("user_id").map_err(read)?),
        row.try_get("content").map_err(read)?,
        image,
        row.try_get("created_at").map_err(read)?,
    ))
}
