//! Convenience result type alias for CodeHub.

use crate::error::AppError;

/// A specialized `Result` type for CodeHub operations.
pub type AppResult<T> = Result<T, AppError>;
