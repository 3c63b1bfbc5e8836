//! Project file operations.

pub mod service;

pub use service::{FileService, IncomingUpload, UploadOutcome};
