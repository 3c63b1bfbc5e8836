//! Trait definitions shared across CodeHub crates.

pub mod content_store;

pub use content_store::{ByteStream, ContentStore};
