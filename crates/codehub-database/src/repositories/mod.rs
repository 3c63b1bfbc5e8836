//! sqlx repository implementations of the store traits.

pub mod comment;
pub mod file;
pub mod project;
pub mod version;

pub use comment::CommentRepository;
pub use file::FileRepository;
pub use project::ProjectRepository;
pub use version::VersionRepository;
