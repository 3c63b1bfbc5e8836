//! Project lifecycle service — creation, sharing, restore, and policy
//! toggles. Every mutation that changes meaningful project state records a
//! ledger version through the orchestrator.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::types::{ProjectId, UserId, VersionId};
use codehub_database::{ProjectStore, VersionStore};
use codehub_entity::project::{MemberPermission, NewProject, Project, ProjectMember};
use codehub_entity::version::{ProjectVersion, VersionAction};

use crate::permission::PermissionService;
use crate::version::VersionOrchestrator;

/// The user a project is being shared with. Account lookup lives with the
/// external auth collaborator, so callers resolve the name themselves.
#[derive(Debug, Clone)]
pub struct ShareTarget {
    /// The target user's id.
    pub user_id: UserId,
    /// Display name used in the version description.
    pub username: String,
}

/// Manages projects and their sharing set.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    versions: Arc<dyn VersionStore>,
    permissions: PermissionService,
    orchestrator: VersionOrchestrator,
}

impl ProjectService {
    /// Create a new project service.
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        versions: Arc<dyn VersionStore>,
        permissions: PermissionService,
        orchestrator: VersionOrchestrator,
    ) -> Self {
        Self {
            projects,
            versions,
            permissions,
            orchestrator,
        }
    }

    /// Create a project and record its initial `v1` version.
    pub async fn create_project(
        &self,
        actor: UserId,
        title: &str,
        description: &str,
        is_public: bool,
    ) -> AppResult<(Project, ProjectVersion)> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Project title is required"));
        }

        let project = self
            .projects
            .create(&NewProject {
                title: title.to_string(),
                description: description.to_string(),
                owner_id: actor,
                is_public,
            })
            .await?;

        let version = self
            .orchestrator
            .record(
                &project,
                actor,
                VersionAction::Created,
                format!("Project \"{title}\" created"),
                None,
            )
            .await?;

        info!(project_id = %project.id, owner = %actor, "Project created");
        Ok((project, version))
    }

    /// Share a project with another user. Owner-only; sharing with
    /// oneself or an existing member is rejected.
    pub async fn share_with(
        &self,
        actor: UserId,
        project_id: ProjectId,
        target: &ShareTarget,
        permission: MemberPermission,
    ) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_owner(actor, &project)?;

        if target.user_id == actor {
            return Err(AppError::validation(
                "You cannot share a project with yourself",
            ));
        }

        let member = ProjectMember::new(project_id, target.user_id, permission);
        self.projects.add_member(&member).await?;

        self.orchestrator
            .record(
                &project,
                actor,
                VersionAction::Shared,
                format!("Shared with {}", target.username),
                None,
            )
            .await
    }

    /// Restore the project to an earlier version. History is never
    /// edited — restoring appends a new `restored` version referencing
    /// the target.
    pub async fn restore(
        &self,
        actor: UserId,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_owner(actor, &project)?;

        let target = self
            .versions
            .find_by_id(project_id, version_id)
            .await?
            .ok_or_else(|| AppError::not_found("Version not found"))?;

        self.orchestrator
            .record(
                &project,
                actor,
                VersionAction::Restored,
                format!(
                    "Restored to {} from {}. Original description: {}",
                    target.label,
                    target.created_at.format("%Y-%m-%d %H:%M"),
                    target.description
                ),
                None,
            )
            .await
    }

    /// Generate (or return) the project's shareable-link token.
    pub async fn ensure_share_link(&self, actor: UserId, project_id: ProjectId) -> AppResult<Uuid> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_owner(actor, &project)?;

        if let Some(token) = project.share_link {
            return Ok(token);
        }
        let token = Uuid::new_v4();
        let updated = self.projects.set_share_link(project_id, token).await?;
        Ok(updated.share_link.unwrap_or(token))
    }

    /// Toggle whether collaborators may delete files.
    pub async fn set_collaborator_delete(
        &self,
        actor: UserId,
        project_id: ProjectId,
        allow: bool,
    ) -> AppResult<Project> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_owner(actor, &project)?;
        self.projects.set_collaborator_delete(project_id, allow).await
    }

    /// Soft-delete a project. The ledger is retained until permanent
    /// deletion cascades it away.
    pub async fn soft_delete(&self, actor: UserId, project_id: ProjectId) -> AppResult<()> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_owner(actor, &project)?;
        self.projects.soft_delete(project_id).await?;
        info!(project_id = %project_id, "Project soft-deleted");
        Ok(())
    }

    async fn require_project(&self, project_id: ProjectId) -> AppResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))
    }
}
