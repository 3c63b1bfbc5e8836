//! Project comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use codehub_core::types::{CommentId, ProjectId, UserId};

/// A comment left on a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The project the comment belongs to.
    pub project_id: ProjectId,
    /// The commenting user.
    pub author_id: UserId,
    /// Comment body.
    pub content: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    /// The project to comment on.
    pub project_id: ProjectId,
    /// The commenting user.
    pub author_id: UserId,
    /// Comment body.
    pub content: String,
}
