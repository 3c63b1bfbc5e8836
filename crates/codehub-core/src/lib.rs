//! # codehub-core
//!
//! Core crate for CodeHub. Contains the unified error system, typed
//! identifiers, pagination types, configuration schemas, and the content
//! store trait.
//!
//! This crate has **no** internal dependencies on other CodeHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
