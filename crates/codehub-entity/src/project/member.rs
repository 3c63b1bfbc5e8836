//! Project membership (sharing) entities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use codehub_core::types::{ProjectId, UserId};

/// Permission level granted to a project member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberPermission {
    /// May view the project and its version history.
    View,
    /// May additionally modify files and add versions.
    Edit,
}

impl MemberPermission {
    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for MemberPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user the project has been shared with.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectMember {
    /// The shared project.
    pub project_id: ProjectId,
    /// The member user.
    pub user_id: UserId,
    /// Permission level granted to this member.
    pub permission: MemberPermission,
    /// When the share was created.
    pub added_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Create a membership record granting the given permission now.
    pub fn new(project_id: ProjectId, user_id: UserId, permission: MemberPermission) -> Self {
        Self {
            project_id,
            user_id,
            permission,
            added_at: Utc::now(),
        }
    }
}
