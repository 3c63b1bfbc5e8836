//! Version artifact download.

use std::path::Path;
use std::sync::Arc;

use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::traits::{ByteStream, ContentStore};
use codehub_core::types::{ProjectId, UserId, VersionId};
use codehub_database::{ProjectStore, VersionStore};

use crate::permission::PermissionService;

/// A resolved artifact download: the byte stream plus the filename the
/// client should save it under.
pub struct ArtifactDownload {
    /// Streamed artifact content.
    pub stream: ByteStream,
    /// Derived filename: `{project-title}_v{label-suffix}{extension}`.
    pub filename: String,
    /// Artifact size in bytes, when recorded.
    pub size_bytes: Option<i64>,
}

impl std::fmt::Debug for ArtifactDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactDownload")
            .field("filename", &self.filename)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// Streams version artifacts out of the content store.
#[derive(Clone)]
pub struct ArtifactDownloadService {
    versions: Arc<dyn VersionStore>,
    projects: Arc<dyn ProjectStore>,
    permissions: PermissionService,
    content: Arc<dyn ContentStore>,
}

impl ArtifactDownloadService {
    /// Create a new download service.
    pub fn new(
        versions: Arc<dyn VersionStore>,
        projects: Arc<dyn ProjectStore>,
        permissions: PermissionService,
        content: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            versions,
            projects,
            permissions,
            content,
        }
    }

    /// Download the artifact attached to a version. Not-found when the
    /// version carries no artifact or the underlying content is missing.
    pub async fn download(
        &self,
        actor: UserId,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ArtifactDownload> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        self.permissions.require_view(actor, &project).await?;

        let version = self
            .versions
            .find_by_id(project_id, version_id)
            .await?
            .ok_or_else(|| AppError::not_found("Version not found"))?;

        let artifact_ref = version
            .artifact_ref
            .as_deref()
            .ok_or_else(|| AppError::not_found("Version has no attached artifact"))?;

        let stream = self.content.read(artifact_ref).await?;
        let filename = format!(
            "{}_v{}{}",
            project.title,
            version.label_suffix(),
            extension_of(artifact_ref)
        );

        Ok(ArtifactDownload {
            stream,
            filename,
            size_bytes: version.artifact_size,
        })
    }
}

/// The extension (with leading dot) of a content reference, or empty.
fn extension_of(content_ref: &str) -> String {
    Path::new(content_ref)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
