//! Point-in-time file listing snapshots.
//!
//! A snapshot is captured once at version-creation time and never mutated
//! afterwards; a restore appends a new version instead of editing history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use codehub_core::types::ProjectFileId;

use crate::file::ProjectFile;

/// Metadata of a single file as it existed at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// The file's identifier at capture time.
    pub file_id: ProjectFileId,
    /// Display name.
    pub name: String,
    /// Reference to the stored binary content.
    pub content_ref: String,
    /// Declared file type.
    pub file_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// An immutable structured listing of a project's files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSnapshot {
    /// Per-file records in listing order.
    pub files: Vec<SnapshotEntry>,
    /// Number of files captured.
    pub total_files: u64,
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
}

impl FileSnapshot {
    /// Capture a snapshot of the given file listing.
    ///
    /// Pure and side-effect free; succeeds for an empty listing with
    /// `total_files = 0`.
    pub fn capture(files: &[ProjectFile]) -> Self {
        let entries: Vec<SnapshotEntry> = files
            .iter()
            .map(|f| SnapshotEntry {
                file_id: f.id,
                name: f.name.clone(),
                content_ref: f.content_ref.clone(),
                file_type: f.file_type.clone(),
                size_bytes: f.size_bytes,
                uploaded_at: f.uploaded_at,
            })
            .collect();
        Self {
            total_files: entries.len() as u64,
            files: entries,
            captured_at: Utc::now(),
        }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::capture(&[])
    }
}
