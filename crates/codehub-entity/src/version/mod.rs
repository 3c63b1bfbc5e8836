//! Version ledger domain entities.

pub mod action;
pub mod model;
pub mod snapshot;
pub mod sort;

pub use action::VersionAction;
pub use model::{NewVersion, ProjectVersion, VersionArtifact};
pub use snapshot::{FileSnapshot, SnapshotEntry};
pub use sort::VersionSort;
