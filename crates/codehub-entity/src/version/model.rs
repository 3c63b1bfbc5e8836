//! Version ledger entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use codehub_core::types::{ProjectId, UserId, VersionId};

use super::action::VersionAction;
use super::snapshot::FileSnapshot;

/// An entry in a project's append-only version ledger.
///
/// Created only through the orchestration protocol; the sole permitted
/// mutation is the atomic latest-flag transition. Removed only as a cascade
/// of permanent project deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectVersion {
    /// Unique version identifier.
    pub id: VersionId,
    /// The project this version belongs to.
    pub project_id: ProjectId,
    /// Sequence label, unique per project (e.g. `v1`, `v2`).
    pub label: String,
    /// The state change this version records.
    pub action: VersionAction,
    /// Free-text description of the change.
    pub description: String,
    /// User who triggered the change.
    pub created_by: UserId,
    /// When the version was created.
    pub created_at: DateTime<Utc>,
    /// Content reference of the attached artifact, if any.
    pub artifact_ref: Option<String>,
    /// Artifact size in bytes.
    pub artifact_size: Option<i64>,
    /// Artifact type derived from its extension.
    pub artifact_type: Option<String>,
    /// Whether this is the project's current head version.
    pub is_latest: bool,
    /// Immutable file listing captured at creation time.
    #[sqlx(json)]
    pub snapshot: FileSnapshot,
}

impl ProjectVersion {
    /// The label without its `v` prefix, used in derived artifact filenames.
    pub fn label_suffix(&self) -> &str {
        self.label.strip_prefix('v').unwrap_or(&self.label)
    }
}

/// An optional binary payload attached directly to a version record,
/// distinct from the project's files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionArtifact {
    /// Reference to the stored content.
    pub content_ref: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Type derived from the artifact's extension.
    pub file_type: String,
}

/// Data required to append a new ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVersion {
    /// The target project.
    pub project_id: ProjectId,
    /// Sequence label allocated by the orchestrator.
    pub label: String,
    /// The state change being recorded.
    pub action: VersionAction,
    /// Free-text description of the change.
    pub description: String,
    /// User who triggered the change.
    pub created_by: UserId,
    /// Optional attached artifact.
    pub artifact: Option<VersionArtifact>,
    /// File listing captured for this version.
    pub snapshot: FileSnapshot,
}
