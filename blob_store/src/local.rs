//! Local filesystem backend for development and tests.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{
    presign::validate_expiry,
    BlobError,
    BlobResult,
    BlobStore,
    ObjectSummary,
    PresignedUrl,
};

const TEMP_FILE_PREFIX: &str = ".upload-";

/// Blob store keeping every object as a file directly under `root`.
///
/// Presigned URLs are plain `file://` URIs: local files carry no signature,
/// so the expiry is reported but not enforced.
#[derive(Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    location: String,
    next_temp_id: AtomicU64,
}

impl LocalBlobStore {
    /// Create the store, creating `root` if it does not exist.
    pub async fn new(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "created local blob store");
        Ok(Self {
            location: format!("file://{}", root.display()),
            root,
            next_temp_id: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> BlobResult<PathBuf> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key == "."
            || key == ".."
            || key.starts_with(TEMP_FILE_PREFIX)
        {
            return Err(BlobError::InvalidUri {
                uri: format!("{}/{}", self.location, key),
                reason: "keys must be plain file names".to_string(),
            });
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn location(&self) -> &str {
        &self.location
    }

    async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with(TEMP_FILE_PREFIX) || !name.starts_with(prefix) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            objects.push(ObjectSummary {
                key: name,
                size_bytes: metadata.len(),
            });
        }
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn upload(&self, key: &str, _content_type: &str, body: Bytes) -> BlobResult<()> {
        let path = self.object_path(key)?;
        let temp_path = self.root.join(format!(
            "{}{}-{}",
            TEMP_FILE_PREFIX,
            std::process::id(),
            self.next_temp_id.fetch_add(1, Ordering::Relaxed)
        ));

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(&body).await?;
        file.flush().await?;
        drop(file);

        // rename replaces an existing object atomically
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        debug!(path = %path.display(), size_bytes = body.len(), "wrote local object");
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        issued_at: SystemTime,
        expires_in: Duration,
    ) -> BlobResult<PresignedUrl> {
        validate_expiry(expires_in).map_err(|reason| BlobError::Presign { reason })?;
        let path = self.object_path(key)?;
        Ok(PresignedUrl::new(
            format!("file://{}", path.display()),
            issued_at,
            expires_in,
        ))
    }
}
