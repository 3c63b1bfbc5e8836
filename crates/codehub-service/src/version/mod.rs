//! Version ledger services: label allocation, creation orchestration,
//! history access, and artifact download.

pub mod allocator;
pub mod download;
pub mod history;
pub mod orchestrator;

pub use download::{ArtifactDownload, ArtifactDownloadService};
pub use history::VersionHistoryService;
pub use orchestrator::VersionOrchestrator;
