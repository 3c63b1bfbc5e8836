//! Project repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use codehub_core::error::{AppError, ErrorKind};
use codehub_core::result::AppResult;
use codehub_core::types::ProjectId;
use codehub_entity::project::{NewProject, Project, ProjectMember};

use crate::store::ProjectStore;

/// Repository for project rows and the sharing membership set.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn create(&self, data: &NewProject) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (title, description, owner_id, is_public) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.owner_id)
        .bind(data.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create project", e))
    }

    async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))
    }

    async fn touch(&self, id: ProjectId) -> AppResult<()> {
        sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to touch project", e))?;
        Ok(())
    }

    async fn set_share_link(&self, id: ProjectId, token: Uuid) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET share_link = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set share link", e))?
        .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    async fn set_collaborator_delete(&self, id: ProjectId, allow: bool) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET allow_collaborator_delete = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(allow)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update delete policy", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    async fn soft_delete(&self, id: ProjectId) -> AppResult<()> {
        sqlx::query(
            "UPDATE projects SET is_deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete project", e))?;
        Ok(())
    }

    async fn add_member(&self, member: &ProjectMember) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id, permission, added_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(member.project_id)
        .bind(member.user_id)
        .bind(member.permission)
        .bind(member.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("Project is already shared with this user")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to add member", e),
        })?;
        Ok(())
    }

    async fn members(&self, id: ProjectId) -> AppResult<Vec<ProjectMember>> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT * FROM project_members WHERE project_id = $1 ORDER BY added_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }
}
