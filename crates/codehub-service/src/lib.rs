//! # codehub-service
//!
//! Business logic service layer for CodeHub. Each service orchestrates
//! stores and the content backend to implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references, so tests can substitute
//! in-memory store implementations.

pub mod comment;
pub mod file;
pub mod locks;
pub mod permission;
pub mod project;
pub mod version;

pub use comment::CommentService;
pub use file::{FileService, IncomingUpload, UploadOutcome};
pub use locks::ProjectLocks;
pub use permission::PermissionService;
pub use project::{ProjectService, ShareTarget};
pub use version::{ArtifactDownloadService, VersionHistoryService, VersionOrchestrator};
