//! Storage configuration

use anyhow::Result;
use std::path::PathBuf;

/// Default uploads root for local development.
pub const DEFAULT_UPLOADS_ROOT: &str = "./uploads";

/// Maximum accepted upload size in bytes (5 MiB, matching the image limit;
/// documents share the same cap).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for the local-disk file store
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory all stored files live under; also served statically at
    /// `/uploads`.
    pub root: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_UPLOADS_ROOT),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("UPLOADS_DIR") {
            config.root = PathBuf::from(root);
        }
        if let Ok(max) = std::env::var("MAX_UPLOAD_BYTES") {
            if let Ok(max) = max.parse() {
                config.max_upload_bytes = max;
            }
        }

        Ok(config)
    }
}
