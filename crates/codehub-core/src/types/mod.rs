//! Shared value types: typed identifiers and pagination.

pub mod id;
pub mod pagination;

pub use id::{CommentId, ProjectFileId, ProjectId, UserId, VersionId};
pub use pagination::{PageRequest, PageResponse};
