//! Content store configuration.

use serde::{Deserialize, Serialize};

/// Content store and upload policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for locally stored content.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// File extensions rejected at upload time (lowercase, with dot).
    #[serde(default = "default_blocked_extensions")]
    pub blocked_extensions: Vec<String>,
}

impl StorageConfig {
    /// Whether a lowercase extension (with leading dot) is blocked.
    pub fn is_extension_blocked(&self, extension: &str) -> bool {
        self.blocked_extensions.iter().any(|e| e == extension)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            blocked_extensions: default_blocked_extensions(),
        }
    }
}

fn default_root_path() -> String {
    "data/content".to_string()
}

fn default_max_upload() -> u64 {
    50 * 1024 * 1024
}

fn default_blocked_extensions() -> Vec<String> {
    [".exe", ".bat", ".cmd", ".sh", ".msi", ".dll"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
