//! Content store trait for uploaded binary content.
//!
//! The version ledger stores only metadata and content references; the
//! bytes themselves live behind this interface. Writes carry at-least-once
//! semantics and are **not** transactionally coupled to ledger commits, so
//! callers store content before committing metadata that references it.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading stored content.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for binary content backends.
///
/// The trait is defined here in `codehub-core` and implemented in
/// `codehub-storage` (local filesystem). Paths are opaque references
/// produced by the caller at upload time.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write bytes at the given reference, creating parent scopes as needed.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Read the content at the given reference as a byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Read the content at the given reference fully into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the content at the given reference.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether content exists at the given reference.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
