//! Blob storage for walker application documents.
//!
//! Handlers only see the [`BlobStore`] trait; the reference it returns is
//! persisted verbatim on the walker profile.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

/// Opaque storage for uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a name derived from `file_name` and return a
    /// reference that can later locate it.
    async fn store(&self, file_name: &str, data: &[u8]) -> std::io::Result<String>;

    /// Remove a blob previously returned by [`BlobStore::store`]. Removing a
    /// reference that no longer exists is not an error.
    async fn delete(&self, reference: &str) -> std::io::Result<()>;
}

/// Stores blobs as files under a root directory.
///
/// Each file gets a random UUID prefix so two uploads with the same
/// original name never collide.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, file_name: &str, data: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Stored blob");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, reference: &str) -> std::io::Result<()> {
        match tokio::fs::remove_file(reference).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Keep only characters that are safe in a file name; strip any directory
/// components.
fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
