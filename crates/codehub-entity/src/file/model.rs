//! Project file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use codehub_core::types::{ProjectFileId, ProjectId};

/// A file belonging to a project.
///
/// Only metadata lives here; the bytes are stored behind the content store
/// and referenced by `content_ref`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectFile {
    /// Unique file identifier.
    pub id: ProjectFileId,
    /// The project this file belongs to.
    pub project_id: ProjectId,
    /// Display name. May encode a relative path (e.g. `docs/readme.md`).
    pub name: String,
    /// Reference to the stored binary content.
    pub content_ref: String,
    /// Declared type derived from the file extension.
    pub file_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

impl ProjectFile {
    /// Get the file extension (lowercase, with leading dot), if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Data required to create a new project file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProjectFile {
    /// The project to attach the file to.
    pub project_id: ProjectId,
    /// Display name.
    pub name: String,
    /// Reference to the stored binary content.
    pub content_ref: String,
    /// Declared type derived from the file extension.
    pub file_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
}

/// Derive the declared file type from a file name, `unknown` when the
/// name carries no extension.
pub fn file_type_from_name(name: &str) -> String {
    extension_of(name)
        .map(|ext| ext.trim_start_matches('.').to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn extension_of(name: &str) -> Option<String> {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
}
