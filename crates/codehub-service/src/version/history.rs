//! Version history read paths and the explicit latest-pointer operation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::traits::ContentStore;
use codehub_core::types::{PageRequest, PageResponse, ProjectId, UserId, VersionId};
use codehub_database::{ProjectStore, VersionStore};
use codehub_entity::file::file_type_from_name;
use codehub_entity::version::{ProjectVersion, VersionArtifact, VersionSort};

use crate::permission::PermissionService;
use crate::version::VersionOrchestrator;

/// Read access to a project's version ledger.
#[derive(Clone)]
pub struct VersionHistoryService {
    versions: Arc<dyn VersionStore>,
    projects: Arc<dyn ProjectStore>,
    permissions: PermissionService,
    orchestrator: VersionOrchestrator,
    content: Arc<dyn ContentStore>,
}

impl VersionHistoryService {
    /// Create a new history service.
    pub fn new(
        versions: Arc<dyn VersionStore>,
        projects: Arc<dyn ProjectStore>,
        permissions: PermissionService,
        orchestrator: VersionOrchestrator,
        content: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            versions,
            projects,
            permissions,
            orchestrator,
            content,
        }
    }

    /// List a project's versions. Unrecognized sort keys silently fall
    /// back to newest-first.
    pub async fn list_versions(
        &self,
        actor: UserId,
        project_id: ProjectId,
        sort: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProjectVersion>> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_view(actor, &project).await?;

        let sort = VersionSort::from_param(sort);
        self.versions.list(project_id, sort, page).await
    }

    /// Fetch the project's latest version: the flagged record, or the most
    /// recently created one when no record carries the flag (a recoverable
    /// degraded state, not an error). Fails with not-found only when the
    /// ledger is empty.
    pub async fn latest(&self, actor: UserId, project_id: ProjectId) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_view(actor, &project).await?;

        if let Some(version) = self.versions.find_flagged_latest(project_id).await? {
            return Ok(version);
        }
        self.versions
            .find_most_recent(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("No versions found for this project"))
    }

    /// Fetch a version by id. Not-found when it does not belong to the
    /// project.
    pub async fn get(
        &self,
        actor: UserId,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_view(actor, &project).await?;

        self.versions
            .find_by_id(project_id, version_id)
            .await?
            .ok_or_else(|| AppError::not_found("Version not found"))
    }

    /// Explicitly mark a version as the project's latest. Owner-only; the
    /// clear-then-set transition is atomic at the storage layer.
    pub async fn set_latest(
        &self,
        actor: UserId,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_owner(actor, &project)?;

        let version = self.versions.mark_latest(project_id, version_id).await?;
        info!(
            project_id = %project_id,
            label = %version.label,
            "Latest pointer moved"
        );
        Ok(version)
    }

    /// Upload an explicit manual version carrying an artifact. The
    /// artifact content is stored before the ledger entry is committed so
    /// a committed record never references missing bytes.
    pub async fn upload_version(
        &self,
        actor: UserId,
        project_id: ProjectId,
        label: &str,
        description: &str,
        file_name: &str,
        data: Bytes,
    ) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_edit(actor, &project).await?;

        let content_ref = format!(
            "project_versions/{}/{}_{}",
            project_id,
            Uuid::new_v4(),
            file_name
        );
        let size_bytes = data.len() as i64;
        self.content.write(&content_ref, data).await?;

        let artifact = VersionArtifact {
            content_ref,
            size_bytes,
            file_type: file_type_from_name(file_name),
        };

        self.orchestrator
            .record_with_label(&project, actor, label, description, Some(artifact))
            .await
    }

    async fn require_project(&self, project_id: ProjectId) -> AppResult<codehub_entity::project::Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))
    }
}
