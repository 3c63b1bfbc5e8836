//! Per-project lock table.
//!
//! Version creation for one project must be serialized while different
//! projects proceed fully in parallel. In a single-instance deployment a
//! keyed async mutex gives exactly that; the storage layer additionally
//! holds a row lock on the project inside each append transaction, which
//! is what carries the guarantee across instances.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use codehub_core::types::ProjectId;

/// Keyed async mutexes, one per project.
///
/// Entries are two words each and are never pruned; the table grows with
/// the number of distinct projects touched by this process.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: DashMap<ProjectId, Arc<Mutex<()>>>,
}

impl ProjectLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for a project, waiting if a concurrent
    /// version creation for the same project is in flight. This is the
    /// only intentional blocking point in the version protocol.
    pub async fn acquire(&self, project_id: ProjectId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(project_id)
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }
}
