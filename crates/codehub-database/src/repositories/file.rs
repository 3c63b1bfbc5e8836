//! Project file repository.

use async_trait::async_trait;
use sqlx::PgPool;

use codehub_core::error::{AppError, ErrorKind};
use codehub_core::result::AppResult;
use codehub_core::types::{ProjectFileId, ProjectId};
use codehub_entity::file::{NewProjectFile, ProjectFile};

use crate::store::FileStore;

/// Repository for project file metadata.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn create(&self, data: &NewProjectFile) -> AppResult<ProjectFile> {
        sqlx::query_as::<_, ProjectFile>(
            "INSERT INTO project_files (project_id, name, content_ref, file_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.project_id)
        .bind(&data.name)
        .bind(&data.content_ref)
        .bind(&data.file_type)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn find_by_id(
        &self,
        project_id: ProjectId,
        file_id: ProjectFileId,
    ) -> AppResult<Option<ProjectFile>> {
        sqlx::query_as::<_, ProjectFile>(
            "SELECT * FROM project_files WHERE project_id = $1 AND id = $2",
        )
        .bind(project_id)
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_for_project(&self, project_id: ProjectId) -> AppResult<Vec<ProjectFile>> {
        sqlx::query_as::<_, ProjectFile>(
            "SELECT * FROM project_files WHERE project_id = $1 ORDER BY uploaded_at, id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn update_size(&self, file_id: ProjectFileId, size_bytes: i64) -> AppResult<ProjectFile> {
        sqlx::query_as::<_, ProjectFile>(
            "UPDATE project_files SET size_bytes = $2 WHERE id = $1 RETURNING *",
        )
        .bind(file_id)
        .bind(size_bytes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    async fn delete(&self, file_id: ProjectFileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM project_files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
