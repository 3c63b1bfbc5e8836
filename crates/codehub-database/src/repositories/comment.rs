//! Comment repository.

use async_trait::async_trait;
use sqlx::PgPool;

use codehub_core::error::{AppError, ErrorKind};
use codehub_core::result::AppResult;
use codehub_core::types::{CommentId, ProjectId};
use codehub_entity::comment::{Comment, NewComment};

use crate::store::CommentStore;

/// Repository for project comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn create(&self, data: &NewComment) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (project_id, author_id, content) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.project_id)
        .bind(data.author_id)
        .bind(&data.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create comment", e))
    }

    async fn list_for_project(&self, project_id: ProjectId) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))
    }

    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }
}
