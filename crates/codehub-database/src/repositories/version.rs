//! Version ledger repository.
//!
//! Enforces the storage-layer half of the ledger invariants: the unique
//! `(project_id, label)` constraint and the single-flagged-latest rule,
//! both inside single transactions that hold a row lock on the project.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use codehub_core::error::{AppError, ErrorKind};
use codehub_core::result::AppResult;
use codehub_core::types::{PageRequest, PageResponse, ProjectId, VersionId};
use codehub_entity::version::{NewVersion, ProjectVersion, VersionSort};

use crate::store::VersionStore;

/// Name of the uniqueness constraint on `(project_id, label)`.
const LABEL_CONSTRAINT: &str = "project_versions_project_id_label_key";

/// Repository for the per-project version ledger.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for VersionRepository {
    async fn append(&self, draft: &NewVersion) -> AppResult<ProjectVersion> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Row lock on the project serializes concurrent appends for the
        // same project across instances; other projects proceed freely.
        let locked: Option<ProjectId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 AND is_deleted = FALSE FOR UPDATE")
                .bind(draft.project_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to lock project row", e)
                })?;
        if locked.is_none() {
            return Err(AppError::not_found(format!(
                "Project {} not found",
                draft.project_id
            )));
        }

        sqlx::query("UPDATE project_versions SET is_latest = FALSE WHERE project_id = $1 AND is_latest = TRUE")
            .bind(draft.project_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear latest flags", e)
            })?;

        let version = sqlx::query_as::<_, ProjectVersion>(
            "INSERT INTO project_versions \
             (project_id, label, action, description, created_by, artifact_ref, artifact_size, artifact_type, is_latest, snapshot) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9) RETURNING *",
        )
        .bind(draft.project_id)
        .bind(&draft.label)
        .bind(draft.action)
        .bind(&draft.description)
        .bind(draft.created_by)
        .bind(draft.artifact.as_ref().map(|a| a.content_ref.as_str()))
        .bind(draft.artifact.as_ref().map(|a| a.size_bytes))
        .bind(draft.artifact.as_ref().map(|a| a.file_type.as_str()))
        .bind(Json(&draft.snapshot))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(LABEL_CONSTRAINT) => {
                AppError::conflict(format!(
                    "Version {} already exists for project {}",
                    draft.label, draft.project_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert version", e),
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit version append", e)
        })?;

        debug!(
            project_id = %draft.project_id,
            label = %version.label,
            action = %version.action,
            "Appended ledger version"
        );
        Ok(version)
    }

    async fn labels(&self, project_id: ProjectId) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT label FROM project_versions WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read labels", e))
    }

    async fn list(
        &self,
        project_id: ProjectId,
        sort: VersionSort,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProjectVersion>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM project_versions WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count versions", e)
                })?;

        let order_by = match sort {
            VersionSort::CreatedAtAsc => "created_at ASC",
            VersionSort::CreatedAtDesc => "created_at DESC",
            VersionSort::LabelAsc => "label ASC",
            VersionSort::LabelDesc => "label DESC",
        };

        let versions = sqlx::query_as::<_, ProjectVersion>(&format!(
            "SELECT * FROM project_versions WHERE project_id = $1 ORDER BY {order_by} LIMIT $2 OFFSET $3"
        ))
        .bind(project_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))?;

        Ok(PageResponse::new(
            versions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_by_id(
        &self,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<Option<ProjectVersion>> {
        sqlx::query_as::<_, ProjectVersion>(
            "SELECT * FROM project_versions WHERE project_id = $1 AND id = $2",
        )
        .bind(project_id)
        .bind(version_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn find_flagged_latest(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Option<ProjectVersion>> {
        sqlx::query_as::<_, ProjectVersion>(
            "SELECT * FROM project_versions WHERE project_id = $1 AND is_latest = TRUE",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find latest version", e)
        })
    }

    async fn find_most_recent(&self, project_id: ProjectId) -> AppResult<Option<ProjectVersion>> {
        sqlx::query_as::<_, ProjectVersion>(
            "SELECT * FROM project_versions WHERE project_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find most recent version", e)
        })
    }

    async fn label_exists(&self, project_id: ProjectId, label: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM project_versions WHERE project_id = $1 AND label = $2",
        )
        .bind(project_id)
        .bind(label)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check label", e))?;
        Ok(count > 0)
    }

    async fn mark_latest(
        &self,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ProjectVersion> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("UPDATE project_versions SET is_latest = FALSE WHERE project_id = $1 AND is_latest = TRUE")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear latest flags", e)
            })?;

        let version = sqlx::query_as::<_, ProjectVersion>(
            "UPDATE project_versions SET is_latest = TRUE WHERE project_id = $1 AND id = $2 RETURNING *",
        )
        .bind(project_id)
        .bind(version_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set latest flag", e))?
        .ok_or_else(|| {
            AppError::not_found(format!("Version {version_id} not found in project {project_id}"))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit latest transition", e)
        })?;
        Ok(version)
    }
}
