//! Project capability checks.
//!
//! Authentication is an external collaborator; this service only answers
//! boolean capability questions about an already-identified actor.

use std::sync::Arc;

use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::types::UserId;
use codehub_database::ProjectStore;
use codehub_entity::project::{MemberPermission, Project};

/// Resolves what an actor may do with a project.
#[derive(Clone)]
pub struct PermissionService {
    projects: Arc<dyn ProjectStore>,
}

impl PermissionService {
    /// Create a new permission service.
    pub fn new(projects: Arc<dyn ProjectStore>) -> Self {
        Self { projects }
    }

    /// Whether the actor owns the project.
    pub fn is_owner(&self, actor: UserId, project: &Project) -> bool {
        project.owner_id == actor
    }

    /// Whether the actor may view the project: owner, member, or the
    /// project is public.
    pub async fn can_view(&self, actor: UserId, project: &Project) -> AppResult<bool> {
        if project.is_public || self.is_owner(actor, project) {
            return Ok(true);
        }
        Ok(self.member_permission(actor, project).await?.is_some())
    }

    /// Whether the actor may modify project content: owner, or a member
    /// with edit permission.
    pub async fn can_edit(&self, actor: UserId, project: &Project) -> AppResult<bool> {
        if self.is_owner(actor, project) {
            return Ok(true);
        }
        Ok(matches!(
            self.member_permission(actor, project).await?,
            Some(MemberPermission::Edit)
        ))
    }

    /// Whether the actor may delete project files: owner, or any member
    /// when the project allows collaborator deletes.
    pub async fn can_delete_files(&self, actor: UserId, project: &Project) -> AppResult<bool> {
        if self.is_owner(actor, project) {
            return Ok(true);
        }
        if !project.allow_collaborator_delete {
            return Ok(false);
        }
        Ok(self.member_permission(actor, project).await?.is_some())
    }

    /// Require view capability or fail with an authorization error.
    pub async fn require_view(&self, actor: UserId, project: &Project) -> AppResult<()> {
        if self.can_view(actor, project).await? {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You don't have permission to view this project",
            ))
        }
    }

    /// Require edit capability or fail with an authorization error.
    pub async fn require_edit(&self, actor: UserId, project: &Project) -> AppResult<()> {
        if self.can_edit(actor, project).await? {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You don't have permission to modify this project",
            ))
        }
    }

    /// Require ownership or fail with an authorization error.
    pub fn require_owner(&self, actor: UserId, project: &Project) -> AppResult<()> {
        if self.is_owner(actor, project) {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only the project owner can perform this action",
            ))
        }
    }

    async fn member_permission(
        &self,
        actor: UserId,
        project: &Project,
    ) -> AppResult<Option<MemberPermission>> {
        let members = self.projects.members(project.id).await?;
        Ok(members
            .iter()
            .find(|m| m.user_id == actor)
            .map(|m| m.permission))
    }
}
