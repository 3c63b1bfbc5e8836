//! Store traits consumed by the service layer.
//!
//! Each trait is implemented by a sqlx repository in [`crate::repositories`].
//! Services hold `Arc<dyn …Store>` so tests can substitute in-memory
//! implementations.

use async_trait::async_trait;
use uuid::Uuid;

use codehub_core::result::AppResult;
use codehub_core::types::{
    CommentId, PageRequest, PageResponse, ProjectFileId, ProjectId, VersionId,
};
use codehub_entity::comment::{Comment, NewComment};
use codehub_entity::file::{NewProjectFile, ProjectFile};
use codehub_entity::project::{NewProject, Project, ProjectMember};
use codehub_entity::version::{NewVersion, ProjectVersion, VersionSort};

/// The persisted, queryable version ledger.
///
/// `append` and `mark_latest` are the two invariant-bearing operations:
/// both run the clear-latest/insert (or clear-latest/set) sequence inside a
/// single storage transaction so no observer ever sees two flagged-latest
/// versions of one project.
#[async_trait]
pub trait VersionStore: Send + Sync + 'static {
    /// Append a new ledger entry with `is_latest = true`.
    ///
    /// Atomically: lock the project row, clear every latest flag for the
    /// project, insert the record. Returns `ErrorKind::Conflict` when the
    /// `(project, label)` uniqueness constraint rejects the insert and
    /// `ErrorKind::NotFound` when the project row is gone.
    async fn append(&self, draft: &NewVersion) -> AppResult<ProjectVersion>;

    /// All labels ever assigned for the project, used by the allocator.
    async fn labels(&self, project_id: ProjectId) -> AppResult<Vec<String>>;

    /// List the project's versions, sorted and paginated.
    async fn list(
        &self,
        project_id: ProjectId,
        sort: VersionSort,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProjectVersion>>;

    /// Find a version by id, scoped to the project.
    async fn find_by_id(
        &self,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<Option<ProjectVersion>>;

    /// The version currently flagged latest, if any.
    async fn find_flagged_latest(&self, project_id: ProjectId)
    -> AppResult<Option<ProjectVersion>>;

    /// The most recently created version, regardless of flags.
    async fn find_most_recent(&self, project_id: ProjectId) -> AppResult<Option<ProjectVersion>>;

    /// Whether a label is already taken for the project.
    async fn label_exists(&self, project_id: ProjectId, label: &str) -> AppResult<bool>;

    /// Atomically clear all latest flags for the project, then flag the
    /// given version. Returns `ErrorKind::NotFound` when the version does
    /// not belong to the project.
    async fn mark_latest(
        &self,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ProjectVersion>;
}

/// Project persistence, including the sharing membership set.
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Create a new project.
    async fn create(&self, data: &NewProject) -> AppResult<Project>;

    /// Find a project by id. Soft-deleted projects are invisible.
    async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>>;

    /// Bump the project's `updated_at` timestamp.
    async fn touch(&self, id: ProjectId) -> AppResult<()>;

    /// Set the project's shareable-link token.
    async fn set_share_link(&self, id: ProjectId, token: Uuid) -> AppResult<Project>;

    /// Toggle whether collaborators may delete files.
    async fn set_collaborator_delete(&self, id: ProjectId, allow: bool) -> AppResult<Project>;

    /// Soft-delete the project.
    async fn soft_delete(&self, id: ProjectId) -> AppResult<()>;

    /// Add a member to the sharing set.
    async fn add_member(&self, member: &ProjectMember) -> AppResult<()>;

    /// The project's sharing set.
    async fn members(&self, id: ProjectId) -> AppResult<Vec<ProjectMember>>;
}

/// Project file metadata persistence (the snapshot builder's listing source).
#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    /// Create a new file record.
    async fn create(&self, data: &NewProjectFile) -> AppResult<ProjectFile>;

    /// Find a file by id, scoped to the project.
    async fn find_by_id(
        &self,
        project_id: ProjectId,
        file_id: ProjectFileId,
    ) -> AppResult<Option<ProjectFile>>;

    /// All files belonging to the project, in upload order.
    async fn list_for_project(&self, project_id: ProjectId) -> AppResult<Vec<ProjectFile>>;

    /// Record new content size after an in-place edit.
    async fn update_size(&self, file_id: ProjectFileId, size_bytes: i64) -> AppResult<ProjectFile>;

    /// Delete a file record. Returns `true` if a row was removed.
    async fn delete(&self, file_id: ProjectFileId) -> AppResult<bool>;
}

/// Comment persistence.
#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    /// Create a new comment.
    async fn create(&self, data: &NewComment) -> AppResult<Comment>;

    /// All comments on the project, oldest first.
    async fn list_for_project(&self, project_id: ProjectId) -> AppResult<Vec<Comment>>;

    /// Find a comment by id.
    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>>;
}
