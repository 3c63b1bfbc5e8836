//! Project comments.
//!
//! Commenting is a readable-project capability, but each comment still
//! lands in the ledger as a `comment_added` version.

use std::sync::Arc;

use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::types::{ProjectId, UserId};
use codehub_database::{CommentStore, ProjectStore};
use codehub_entity::comment::{Comment, NewComment};
use codehub_entity::version::{ProjectVersion, VersionAction};

use crate::permission::PermissionService;
use crate::version::VersionOrchestrator;

/// Manages project comments.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    projects: Arc<dyn ProjectStore>,
    permissions: PermissionService,
    orchestrator: VersionOrchestrator,
}

impl CommentService {
    /// Create a new comment service.
    pub fn new(
        comments: Arc<dyn CommentStore>,
        projects: Arc<dyn ProjectStore>,
        permissions: PermissionService,
        orchestrator: VersionOrchestrator,
    ) -> Self {
        Self {
            comments,
            projects,
            permissions,
            orchestrator,
        }
    }

    /// Add a comment to a project the actor can view.
    pub async fn add_comment(
        &self,
        actor: UserId,
        project_id: ProjectId,
        content: &str,
    ) -> AppResult<(Comment, ProjectVersion)> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        self.permissions.require_view(actor, &project).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Comment content is required"));
        }

        let comment = self
            .comments
            .create(&NewComment {
                project_id,
                author_id: actor,
                content: content.to_string(),
            })
            .await?;

        let version = self
            .orchestrator
            .record(
                &project,
                actor,
                VersionAction::CommentAdded,
                "Comment added",
                None,
            )
            .await?;
        Ok((comment, version))
    }

    /// All comments on a project, oldest first.
    pub async fn list_comments(&self, actor: UserId, project_id: ProjectId) -> AppResult<Vec<Comment>> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        self.permissions.require_view(actor, &project).await?;
        self.comments.list_for_project(project_id).await
    }
}
