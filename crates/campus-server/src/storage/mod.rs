//! Local-disk file storage
//!
//! The rest of the server only needs "store blob, get reference, delete by
//! reference". A stored file's reference is its web path, `/uploads/<name>`;
//! the name is `{owner}-{uuid}{ext}` so concurrent uploads never collide and
//! references never leak the original filename.
//!
//! Deletion is best-effort: record mutations are the point of commit, and
//! file-system failures during cleanup are logged, never surfaced to
//! callers.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub mod config;

/// Web path prefix under which stored files are served.
pub const WEB_PREFIX: &str = "/uploads/";

#[derive(Clone)]
pub struct Storage {
    root: PathBuf,
    max_upload_bytes: usize,
}

/// Result of storing a file
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Reference persisted in records and handed to clients (`/uploads/..`).
    pub web_path: String,
}

impl Storage {
    /// Initialize the store, creating the uploads root if missing.
    pub async fn new(config: config::StorageConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.root)
            .await
            .with_context(|| format!("Failed to create uploads root {:?}", config.root))?;

        info!(root = %config.root.display(), "Storage initialized");

        Ok(Self {
            root: config.root,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Directory served statically at `/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Store a blob for `owner`, deriving the extension from the original
    /// filename. Returns the stored file's web path.
    #[instrument(skip(self, data), fields(owner = %owner, size = data.len()))]
    pub async fn save(&self, owner: Uuid, original_name: &str, data: &[u8]) -> Result<StoredFile> {
        if data.is_empty() {
            anyhow::bail!("Refusing to store an empty file");
        }
        if data.len() > self.max_upload_bytes {
            anyhow::bail!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_bytes
            );
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        let file_name = format!("{}-{}{}", owner, Uuid::new_v4(), ext);
        let target = self.root.join(&file_name);

        tokio::fs::write(&target, data)
            .await
            .with_context(|| format!("Failed to write {:?}", target))?;

        debug!(file = %file_name, "Stored file");

        Ok(StoredFile {
            web_path: format!("{}{}", WEB_PREFIX, file_name),
        })
    }

    /// Best-effort delete by stored reference. References outside the
    /// uploads root are refused; a missing file counts as deleted. Errors
    /// are logged and swallowed so callers never fail on cleanup.
    #[instrument(skip(self))]
    pub async fn delete(&self, web_path: &str) {
        let Some(file_name) = Self::file_name_of(web_path) else {
            warn!(path = %web_path, "Refusing to delete reference outside the uploads root");
            return;
        };

        let target = self.root.join(file_name);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => debug!(file = %file_name, "Deleted file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %file_name, "File already absent")
            },
            Err(e) => warn!(file = %file_name, error = %e, "Failed to delete file"),
        }
    }

    /// Extract the bare file name from a stored reference, rejecting
    /// anything that is not directly under the uploads prefix.
    fn file_name_of(web_path: &str) -> Option<&str> {
        let name = web_path.strip_prefix(WEB_PREFIX)?;
        if name.is_empty() || name.contains('/') || name.contains("..") || name.contains('\\') {
            return None;
        }
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage(dir: &Path) -> Storage {
        Storage {
            root: dir.to_path_buf(),
            max_upload_bytes: 1024,
        }
    }

    #[test]
    fn test_file_name_of_accepts_plain_references() {
        assert_eq!(
            Storage::file_name_of("/uploads/abc-def.png"),
            Some("abc-def.png")
        );
    }

    #[test]
    fn test_file_name_of_rejects_traversal() {
        assert_eq!(Storage::file_name_of("/uploads/../etc/passwd"), None);
        assert_eq!(Storage::file_name_of("/uploads/a/b.png"), None);
        assert_eq!(Storage::file_name_of("/etc/passwd"), None);
        assert_eq!(Storage::file_name_of("/uploads/"), None);
    }

    #[tokio::test]
    async fn test_save_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path());
        let owner = Uuid::new_v4();

        let stored = storage.save(owner, "syllabus.PDF", b"content").await.unwrap();
        assert!(stored.web_path.starts_with(WEB_PREFIX));
        assert!(stored.web_path.ends_with(".pdf"));

        let on_disk = dir
            .path()
            .join(stored.web_path.strip_prefix(WEB_PREFIX).unwrap());
        assert!(on_disk.exists());

        storage.delete(&stored.web_path).await;
        assert!(!on_disk.exists());

        // Deleting again is silently fine.
        storage.delete(&stored.web_path).await;
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = test_storage(dir.path());
        let owner = Uuid::new_v4();

        assert!(storage.save(owner, "x.png", &[]).await.is_err());
        assert!(storage.save(owner, "x.png", &[0u8; 2048]).await.is_err());
    }
}
