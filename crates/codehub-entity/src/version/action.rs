//! Version action enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of state change a ledger version records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "version_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VersionAction {
    /// The project was created.
    Created,
    /// One or more files were uploaded.
    FileAdded,
    /// A file's content was edited in place.
    FileUpdated,
    /// A file was removed.
    FileDeleted,
    /// The project was shared with another user.
    Shared,
    /// A comment was added.
    CommentAdded,
    /// An explicit manual save, possibly carrying an artifact.
    Manual,
    /// The project was restored to an earlier version.
    Restored,
}

impl VersionAction {
    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::FileAdded => "file_added",
            Self::FileUpdated => "file_updated",
            Self::FileDeleted => "file_deleted",
            Self::Shared => "shared",
            Self::CommentAdded => "comment_added",
            Self::Manual => "manual",
            Self::Restored => "restored",
        }
    }
}

impl fmt::Display for VersionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
