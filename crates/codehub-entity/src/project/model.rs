//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use codehub_core::types::{ProjectId, UserId};

/// A user project hosting files, comments, and a version ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Project title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// The owning user. Projects are owned by exactly one user.
    pub owner_id: UserId,
    /// Whether the project is visible to everyone.
    pub is_public: bool,
    /// Soft-delete flag. Deleted projects disappear from all reads.
    pub is_deleted: bool,
    /// When the project was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Shareable-link token, if one has been generated.
    pub share_link: Option<Uuid>,
    /// Whether non-owner collaborators may delete project files.
    pub allow_collaborator_delete: bool,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    /// Project title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// The owning user.
    pub owner_id: UserId,
    /// Whether the project is visible to everyone.
    pub is_public: bool,
}
