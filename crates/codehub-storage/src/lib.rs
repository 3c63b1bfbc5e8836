//! # codehub-storage
//!
//! Content store backends for CodeHub. The [`ContentStore`] trait lives in
//! `codehub-core`; this crate provides the local filesystem implementation.
//!
//! [`ContentStore`]: codehub_core::traits::ContentStore

pub mod local;

pub use local::LocalContentStore;
