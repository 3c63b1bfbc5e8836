//! Sort keys for version listings.

use serde::{Deserialize, Serialize};

/// Sort order for a project's version listing.
///
/// Parsed from the query-parameter convention where a leading `-` means
/// descending. Unrecognized keys silently fall back to the default
/// (newest creation time first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionSort {
    /// Oldest first.
    CreatedAtAsc,
    /// Newest first (default).
    #[default]
    CreatedAtDesc,
    /// Label ascending.
    LabelAsc,
    /// Label descending.
    LabelDesc,
}

impl VersionSort {
    /// Parse a sort parameter, falling back to the default for anything
    /// unrecognized (including `None`).
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("created_at") => Self::CreatedAtAsc,
            Some("-created_at") => Self::CreatedAtDesc,
            Some("label") => Self::LabelAsc,
            Some("-label") => Self::LabelDesc,
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        assert_eq!(
            VersionSort::from_param(Some("created_at")),
            VersionSort::CreatedAtAsc
        );
        assert_eq!(
            VersionSort::from_param(Some("-label")),
            VersionSort::LabelDesc
        );
    }

    #[test]
    fn test_invalid_key_falls_back_to_default() {
        assert_eq!(
            VersionSort::from_param(Some("size")),
            VersionSort::CreatedAtDesc
        );
        assert_eq!(VersionSort::from_param(None), VersionSort::CreatedAtDesc);
    }
}
