//! Version creation orchestrator.
//!
//! The single path by which ledger entries come into existence. Every
//! mutating feature (project creation, uploads, deletes, comments, shares,
//! restores, manual saves) calls [`VersionOrchestrator::record`] instead of
//! constructing a `ProjectVersion` itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use codehub_core::error::AppError;
use codehub_core::result::AppResult;
use codehub_core::types::UserId;
use codehub_database::{FileStore, VersionStore};
use codehub_entity::project::Project;
use codehub_entity::version::{
    FileSnapshot, NewVersion, ProjectVersion, VersionAction, VersionArtifact,
};

use crate::locks::ProjectLocks;

use super::allocator;

/// Attempts at the sequential label before switching to the timestamp
/// fallback.
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff between attempts; grows linearly.
const RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Coordinates locking, label allocation, snapshot capture, and the
/// latest-pointer transition for new ledger entries.
#[derive(Clone)]
pub struct VersionOrchestrator {
    versions: Arc<dyn VersionStore>,
    files: Arc<dyn FileStore>,
    locks: Arc<ProjectLocks>,
}

impl VersionOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        versions: Arc<dyn VersionStore>,
        files: Arc<dyn FileStore>,
        locks: Arc<ProjectLocks>,
    ) -> Self {
        Self {
            versions,
            files,
            locks,
        }
    }

    /// Record a state change as a new ledger entry.
    ///
    /// Serialized per project; invocations for different projects proceed
    /// in parallel. Each call appends exactly one record — there is no
    /// idempotence, callers invoke this once per logical action.
    ///
    /// A lost label race (unique-constraint conflict) is retried up to
    /// [`MAX_ATTEMPTS`] times with backoff, re-reading the maximum label
    /// inside the lock each time; after that a timestamp-derived label is
    /// used so the operation cannot fail permanently on label contention
    /// alone. Every other error class surfaces immediately.
    pub async fn record(
        &self,
        project: &Project,
        actor: UserId,
        action: VersionAction,
        description: impl Into<String>,
        artifact: Option<VersionArtifact>,
    ) -> AppResult<ProjectVersion> {
        let description = description.into();
        let _guard = self.locks.acquire(project.id).await;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let labels = self.versions.labels(project.id).await?;
            let label = allocator::next_label(labels.iter().map(String::as_str));

            match self
                .try_append(project, actor, action, &description, &label, &artifact)
                .await
            {
                Ok(version) => return Ok(version),
                Err(e) if e.is_conflict() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        project_id = %project.id,
                        label,
                        attempt,
                        "Version label race lost, retrying"
                    );
                    sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) if e.is_conflict() => {
                    let fallback = allocator::fallback_label();
                    warn!(
                        project_id = %project.id,
                        label = %fallback,
                        "Retries exhausted, using timestamp fallback label"
                    );
                    return self
                        .try_append(project, actor, action, &description, &fallback, &artifact)
                        .await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Record a manual version with a caller-supplied label (the explicit
    /// upload path). The label must be unused; a duplicate is a validation
    /// error, not a retryable race.
    pub async fn record_with_label(
        &self,
        project: &Project,
        actor: UserId,
        label: &str,
        description: impl Into<String>,
        artifact: Option<VersionArtifact>,
    ) -> AppResult<ProjectVersion> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AppError::validation("Version label is required"));
        }

        let _guard = self.locks.acquire(project.id).await;

        if self.versions.label_exists(project.id, label).await? {
            return Err(AppError::validation(format!(
                "Version {label} already exists for this project"
            )));
        }

        self.try_append(
            project,
            actor,
            VersionAction::Manual,
            &description.into(),
            label,
            &artifact,
        )
        .await
    }

    /// One attempt of the clear-latest + insert + snapshot sequence. The
    /// store runs it atomically; the snapshot is captured fresh so every
    /// retry sees the current listing.
    async fn try_append(
        &self,
        project: &Project,
        actor: UserId,
        action: VersionAction,
        description: &str,
        label: &str,
        artifact: &Option<VersionArtifact>,
    ) -> AppResult<ProjectVersion> {
        let files = self.files.list_for_project(project.id).await?;
        let snapshot = FileSnapshot::capture(&files);

        let draft = NewVersion {
            project_id: project.id,
            label: label.to_string(),
            action,
            description: description.to_string(),
            created_by: actor,
            artifact: artifact.clone(),
            snapshot,
        };

        let version = self.versions.append(&draft).await?;
        info!(
            project_id = %project.id,
            label = %version.label,
            action = %action,
            total_files = version.snapshot.total_files,
            "Version created"
        );
        Ok(version)
    }
}
