//! File upload, edit, and delete flows.
//!
//! Content is written to the store before metadata is committed, so a
//! committed file row never points at missing bytes; a crash between the
//! two leaves only an orphaned blob.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use codehub_core::config::StorageConfig;
use codehub_core::error::{AppError, ErrorKind};
use codehub_core::result::AppResult;
use codehub_core::traits::ContentStore;
use codehub_core::types::{ProjectFileId, ProjectId, UserId};
use codehub_database::{FileStore, ProjectStore};
use codehub_entity::file::{NewProjectFile, ProjectFile, file_type_from_name};
use codehub_entity::version::{ProjectVersion, VersionAction};

use crate::permission::PermissionService;
use crate::version::VersionOrchestrator;

/// A file submitted for upload.
#[derive(Debug, Clone)]
pub struct IncomingUpload {
    /// Display name, possibly with a relative path.
    pub name: String,
    /// File content.
    pub data: Bytes,
}

/// Result of a multi-file upload: what landed, what was rejected, and the
/// ledger version recorded when at least one file landed.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Successfully stored files.
    pub uploaded: Vec<ProjectFile>,
    /// Per-file rejections as `(name, reason)`.
    pub rejected: Vec<(String, String)>,
    /// The `file_added` version, when any file landed.
    pub version: Option<ProjectVersion>,
}

/// Manages project file content and metadata.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    projects: Arc<dyn ProjectStore>,
    content: Arc<dyn ContentStore>,
    permissions: PermissionService,
    orchestrator: VersionOrchestrator,
    storage_config: StorageConfig,
}

impl FileService {
    /// Create a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        projects: Arc<dyn ProjectStore>,
        content: Arc<dyn ContentStore>,
        permissions: PermissionService,
        orchestrator: VersionOrchestrator,
        storage_config: StorageConfig,
    ) -> Self {
        Self {
            files,
            projects,
            content,
            permissions,
            orchestrator,
            storage_config,
        }
    }

    /// Upload a batch of files. Individual files failing validation are
    /// rejected without aborting the batch; one `file_added` version is
    /// recorded when at least one file lands.
    pub async fn upload_files(
        &self,
        actor: UserId,
        project_id: ProjectId,
        uploads: Vec<IncomingUpload>,
    ) -> AppResult<UploadOutcome> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_edit(actor, &project).await?;

        let mut uploaded = Vec::new();
        let mut rejected = Vec::new();

        for upload in uploads {
            if let Err(reason) = self.validate_upload(&upload) {
                rejected.push((upload.name, reason));
                continue;
            }

            let content_ref = format!(
                "project_files/{}/{}_{}",
                project_id,
                Uuid::new_v4(),
                upload.name
            );
            let size_bytes = upload.data.len() as i64;
            self.content.write(&content_ref, upload.data).await?;

            let file = self
                .files
                .create(&NewProjectFile {
                    project_id,
                    name: upload.name.clone(),
                    content_ref,
                    file_type: file_type_from_name(&upload.name),
                    size_bytes,
                })
                .await?;
            uploaded.push(file);
        }

        let version = if uploaded.is_empty() {
            None
        } else {
            let description = format!(
                "Added {} file(s): {}",
                uploaded.len(),
                summarize_names(&uploaded)
            );
            Some(
                self.orchestrator
                    .record(&project, actor, VersionAction::FileAdded, description, None)
                    .await?,
            )
        };

        info!(
            project_id = %project_id,
            uploaded = uploaded.len(),
            rejected = rejected.len(),
            "File upload processed"
        );
        Ok(UploadOutcome {
            uploaded,
            rejected,
            version,
        })
    }

    /// Replace a file's content in place and record a `file_updated`
    /// version.
    pub async fn update_file(
        &self,
        actor: UserId,
        project_id: ProjectId,
        file_id: ProjectFileId,
        data: Bytes,
    ) -> AppResult<(ProjectFile, ProjectVersion)> {
        let project = self.require_project(project_id).await?;
        self.permissions.require_edit(actor, &project).await?;

        let file = self
            .files
            .find_by_id(project_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let size_bytes = data.len() as i64;
        self.content.write(&file.content_ref, data).await?;
        let file = self.files.update_size(file_id, size_bytes).await?;

        let version = self
            .orchestrator
            .record(
                &project,
                actor,
                VersionAction::FileUpdated,
                format!("Updated file: {}", file.name),
                None,
            )
            .await?;
        Ok((file, version))
    }

    /// Delete a file and record a `file_deleted` version. Allowed for the
    /// owner, or for members when the project permits collaborator
    /// deletes.
    pub async fn delete_file(
        &self,
        actor: UserId,
        project_id: ProjectId,
        file_id: ProjectFileId,
    ) -> AppResult<ProjectVersion> {
        let project = self.require_project(project_id).await?;
        if !self.permissions.can_delete_files(actor, &project).await? {
            return Err(AppError::authorization(
                "You don't have permission to delete files from this project",
            ));
        }

        let file = self
            .files
            .find_by_id(project_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        // Content first; a missing blob is tolerable, the row must go.
        match self.content.delete(&file.content_ref).await {
            Ok(()) => {}
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(content_ref = %file.content_ref, "Deleted file had no stored content");
            }
            Err(e) => return Err(e),
        }
        self.files.delete(file_id).await?;

        self.orchestrator
            .record(
                &project,
                actor,
                VersionAction::FileDeleted,
                format!("Deleted file: {}", file.name),
                None,
            )
            .await
    }

    fn validate_upload(&self, upload: &IncomingUpload) -> Result<(), String> {
        let name = upload.name.trim();
        if name.is_empty() {
            return Err("File name is required".to_string());
        }

        let file_type = file_type_from_name(name);
        let extension = format!(".{file_type}");
        if self.storage_config.is_extension_blocked(&extension) {
            return Err(format!(
                "File type {extension} is not allowed for security reasons"
            ));
        }

        let max = self.storage_config.max_upload_size_bytes;
        if upload.data.len() as u64 > max {
            return Err(format!(
                "File size ({:.1}MB) exceeds the maximum allowed size of {}MB",
                upload.data.len() as f64 / (1024.0 * 1024.0),
                max / (1024 * 1024)
            ));
        }
        Ok(())
    }

    async fn require_project(
        &self,
        project_id: ProjectId,
    ) -> AppResult<codehub_entity::project::Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))
    }
}

/// Up to three file names, then "and N more".
fn summarize_names(files: &[ProjectFile]) -> String {
    let mut summary = files
        .iter()
        .take(3)
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if files.len() > 3 {
        summary.push_str(&format!(" and {} more", files.len() - 3));
    }
    summary
}
