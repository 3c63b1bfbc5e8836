//! Project domain entities.

pub mod member;
pub mod model;

pub use member::{MemberPermission, ProjectMember};
pub use model::{NewProject, Project};
