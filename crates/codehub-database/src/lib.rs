//! # codehub-database
//!
//! Database layer for CodeHub: PostgreSQL pool management, the migration
//! runner, the store traits consumed by the service layer, and their sqlx
//! repository implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CommentStore, FileStore, ProjectStore, VersionStore};
