//! Project file domain entities.

pub mod model;

pub use model::{NewProjectFile, ProjectFile, file_type_from_name};
