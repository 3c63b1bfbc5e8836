//! In-memory store doubles and a wired-up service harness for
//! integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::stream;
use uuid::Uuid;

use codehub_core::config::StorageConfig;
use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::traits::{ByteStream, ContentStore};
use codehub_core::types::{
    CommentId, PageRequest, PageResponse, ProjectFileId, ProjectId, UserId, VersionId,
};
use codehub_database::{CommentStore, FileStore, ProjectStore, VersionStore};
use codehub_entity::comment::{Comment, NewComment};
use codehub_entity::file::{NewProjectFile, ProjectFile};
use codehub_entity::project::{NewProject, Project, ProjectMember};
use codehub_entity::version::{NewVersion, ProjectVersion, VersionSort};
use codehub_service::{
    ArtifactDownloadService, CommentService, FileService, PermissionService, ProjectLocks,
    ProjectService, VersionHistoryService, VersionOrchestrator,
};

/// In-memory version ledger mirroring the repository's append semantics:
/// duplicate `(project, label)` conflicts, clear-then-insert latest flag
/// handling. `force_conflicts` makes the next N appends fail with a
/// conflict regardless of label, to exercise the retry path.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    rows: Mutex<Vec<ProjectVersion>>,
    force_conflicts: AtomicU32,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` appends fail with a conflict.
    pub fn force_conflicts(&self, n: u32) {
        self.force_conflicts.store(n, Ordering::SeqCst);
    }

    /// Directly flip latest flags, simulating external flag corruption.
    pub fn clear_all_latest_flags(&self, project_id: ProjectId) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut().filter(|r| r.project_id == project_id) {
            row.is_latest = false;
        }
    }

    pub fn all_for_project(&self, project_id: ProjectId) -> Vec<ProjectVersion> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn append(&self, draft: &NewVersion) -> AppResult<ProjectVersion> {
        if self
            .force_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::conflict("forced conflict"));
        }

        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.project_id == draft.project_id && r.label == draft.label)
        {
            return Err(AppError::conflict(format!(
                "Version {} already exists",
                draft.label
            )));
        }
        for row in rows.iter_mut().filter(|r| r.project_id == draft.project_id) {
            row.is_latest = false;
        }
        let version = ProjectVersion {
            id: VersionId::new(),
            project_id: draft.project_id,
            label: draft.label.clone(),
            action: draft.action,
            description: draft.description.clone(),
            created_by: draft.created_by,
            created_at: Utc::now(),
            artifact_ref: draft.artifact.as_ref().map(|a| a.content_ref.clone()),
            artifact_size: draft.artifact.as_ref().map(|a| a.size_bytes),
            artifact_type: draft.artifact.as_ref().map(|a| a.file_type.clone()),
            is_latest: true,
            snapshot: draft.snapshot.clone(),
        };
        rows.push(version.clone());
        Ok(version)
    }

    async fn labels(&self, project_id: ProjectId) -> AppResult<Vec<String>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.project_id == project_id)
            .map(|r| r.label.clone())
            .collect())
    }

    async fn list(
        &self,
        project_id: ProjectId,
        sort: VersionSort,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ProjectVersion>> {
        let mut rows: Vec<ProjectVersion> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect();

        match sort {
            VersionSort::CreatedAtAsc => rows.sort_by_key(|r| r.created_at),
            VersionSort::CreatedAtDesc => {
                rows.sort_by_key(|r| r.created_at);
                rows.reverse();
            }
            VersionSort::LabelAsc => rows.sort_by(|a, b| a.label.cmp(&b.label)),
            VersionSort::LabelDesc => rows.sort_by(|a, b| b.label.cmp(&a.label)),
        }

        let total = rows.len() as u64;
        let items: Vec<ProjectVersion> = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn find_by_id(
        &self,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<Option<ProjectVersion>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.project_id == project_id && r.id == version_id)
            .cloned())
    }

    async fn find_flagged_latest(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Option<ProjectVersion>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.project_id == project_id && r.is_latest)
            .cloned())
    }

    async fn find_most_recent(&self, project_id: ProjectId) -> AppResult<Option<ProjectVersion>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.project_id == project_id)
            .max_by_key(|(i, r)| (r.created_at, *i))
            .map(|(_, r)| r.clone()))
    }

    async fn label_exists(&self, project_id: ProjectId, label: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.project_id == project_id && r.label == label))
    }

    async fn mark_latest(
        &self,
        project_id: ProjectId,
        version_id: VersionId,
    ) -> AppResult<ProjectVersion> {
        let mut rows = self.rows.lock().unwrap();
        if !rows
            .iter()
            .any(|r| r.project_id == project_id && r.id == version_id)
        {
            return Err(AppError::not_found("Version not found"));
        }
        let mut marked = None;
        for row in rows.iter_mut().filter(|r| r.project_id == project_id) {
            row.is_latest = row.id == version_id;
            if row.is_latest {
                marked = Some(row.clone());
            }
        }
        Ok(marked.expect("marked version"))
    }
}

#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: Mutex<Vec<Project>>,
    members: Mutex<Vec<ProjectMember>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create(&self, data: &NewProject) -> AppResult<Project> {
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(),
            title: data.title.clone(),
            description: data.description.clone(),
            owner_id: data.owner_id,
            is_public: data.is_public,
            is_deleted: false,
            deleted_at: None,
            share_link: None,
            allow_collaborator_delete: false,
            created_at: now,
            updated_at: now,
        };
        self.projects.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && !p.is_deleted)
            .cloned())
    }

    async fn touch(&self, id: ProjectId) -> AppResult<()> {
        let mut projects = self.projects.lock().unwrap();
        if let Some(p) = projects.iter_mut().find(|p| p.id == id) {
            p.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_share_link(&self, id: ProjectId, token: Uuid) -> AppResult<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        project.share_link = Some(token);
        Ok(project.clone())
    }

    async fn set_collaborator_delete(&self, id: ProjectId, allow: bool) -> AppResult<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        project.allow_collaborator_delete = allow;
        Ok(project.clone())
    }

    async fn soft_delete(&self, id: ProjectId) -> AppResult<()> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        project.is_deleted = true;
        project.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn add_member(&self, member: &ProjectMember) -> AppResult<()> {
        let mut members = self.members.lock().unwrap();
        if members
            .iter()
            .any(|m| m.project_id == member.project_id && m.user_id == member.user_id)
        {
            return Err(AppError::conflict(
                "Project is already shared with this user",
            ));
        }
        members.push(member.clone());
        Ok(())
    }

    async fn members(&self, id: ProjectId) -> AppResult<Vec<ProjectMember>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryFileStore {
    rows: Mutex<Vec<ProjectFile>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create(&self, data: &NewProjectFile) -> AppResult<ProjectFile> {
        let file = ProjectFile {
            id: ProjectFileId::new(),
            project_id: data.project_id,
            name: data.name.clone(),
            content_ref: data.content_ref.clone(),
            file_type: data.file_type.clone(),
            size_bytes: data.size_bytes,
            uploaded_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(file.clone());
        Ok(file)
    }

    async fn find_by_id(
        &self,
        project_id: ProjectId,
        file_id: ProjectFileId,
    ) -> AppResult<Option<ProjectFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.project_id == project_id && f.id == file_id)
            .cloned())
    }

    async fn list_for_project(&self, project_id: ProjectId) -> AppResult<Vec<ProjectFile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_size(&self, file_id: ProjectFileId, size_bytes: i64) -> AppResult<ProjectFile> {
        let mut rows = self.rows.lock().unwrap();
        let file = rows
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.size_bytes = size_bytes;
        Ok(file.clone())
    }

    async fn delete(&self, file_id: ProjectFileId) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| f.id != file_id);
        Ok(rows.len() < before)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCommentStore {
    rows: Mutex<Vec<Comment>>,
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn create(&self, data: &NewComment) -> AppResult<Comment> {
        let comment = Comment {
            id: CommentId::new(),
            project_id: data.project_id,
            author_id: data.author_id,
            content: data.content.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn list_for_project(&self, project_id: ProjectId) -> AppResult<Vec<Comment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: CommentId) -> AppResult<Option<Comment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

/// Content store backed by a map of reference -> bytes.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.blobs.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self.read_bytes(path).await?;
        Ok(Box::pin(stream::once(async move { Ok(data) })))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Content not found: {path}")))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.blobs
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Content not found: {path}")))
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(path))
    }
}

/// All services wired over the in-memory stores.
pub struct TestApp {
    pub versions: Arc<MemoryVersionStore>,
    pub projects: Arc<MemoryProjectStore>,
    pub files: Arc<MemoryFileStore>,
    pub comments: Arc<MemoryCommentStore>,
    pub content: Arc<MemoryContentStore>,
    pub orchestrator: VersionOrchestrator,
    pub project_service: ProjectService,
    pub file_service: FileService,
    pub comment_service: CommentService,
    pub history: VersionHistoryService,
    pub downloads: ArtifactDownloadService,
}

impl TestApp {
    pub fn new() -> Self {
        let versions = Arc::new(MemoryVersionStore::new());
        let projects = Arc::new(MemoryProjectStore::new());
        let files = Arc::new(MemoryFileStore::new());
        let comments = Arc::new(MemoryCommentStore::new());
        let content = Arc::new(MemoryContentStore::new());

        let permissions = PermissionService::new(projects.clone());
        let locks = Arc::new(ProjectLocks::new());
        let orchestrator =
            VersionOrchestrator::new(versions.clone(), files.clone(), locks);

        let project_service = ProjectService::new(
            projects.clone(),
            versions.clone(),
            permissions.clone(),
            orchestrator.clone(),
        );
        let file_service = FileService::new(
            files.clone(),
            projects.clone(),
            content.clone(),
            permissions.clone(),
            orchestrator.clone(),
            StorageConfig::default(),
        );
        let comment_service = CommentService::new(
            comments.clone(),
            projects.clone(),
            permissions.clone(),
            orchestrator.clone(),
        );
        let history = VersionHistoryService::new(
            versions.clone(),
            projects.clone(),
            permissions.clone(),
            orchestrator.clone(),
            content.clone(),
        );
        let downloads = ArtifactDownloadService::new(
            versions.clone(),
            projects.clone(),
            permissions,
            content.clone(),
        );

        Self {
            versions,
            projects,
            files,
            comments,
            content,
            orchestrator,
            project_service,
            file_service,
            comment_service,
            history,
            downloads,
        }
    }

    /// A file service wired over the same stores but with a custom
    /// upload policy.
    pub fn file_service_with_config(&self, config: StorageConfig) -> FileService {
        FileService::new(
            self.files.clone(),
            self.projects.clone(),
            self.content.clone(),
            PermissionService::new(self.projects.clone()),
            self.orchestrator.clone(),
            config,
        )
    }

    /// Create a project owned by `owner` and return it with its `v1`.
    pub async fn seed_project(&self, owner: UserId, title: &str) -> Project {
        let (project, version) = self
            .project_service
            .create_project(owner, title, "test project", false)
            .await
            .expect("create project");
        assert_eq!(version.label, "v1");
        project
    }
}
