//! Project lifecycle and sharing.

pub mod service;

pub use service::{ProjectService, ShareTarget};
