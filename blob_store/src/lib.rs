//! Object storage backends for the secret drop service.
//!
//! The service only ever needs three capabilities from its backing store:
//!
//! - list objects under a key prefix (used as an existence check),
//! - upload a single small object in one shot,
//! - produce a presigned, time-limited GET URL for an object.
//!
//! [`BlobStore`] captures exactly that surface. [`S3BlobStore`] implements it
//! against Amazon S3 (or an S3-compatible endpoint) and [`LocalBlobStore`]
//! against a directory on local disk for development.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::{Duration, SystemTime};
//!
//! use blob_store::{open_blob_store, BlobStorageConfig};
//!
//! # async fn example() -> Result<(), blob_store::BlobError> {
//! let config = BlobStorageConfig {
//!     path: "s3://users-shared-secrets".to_string(),
//!     region: Some("us-west-2".to_string()),
//!     endpoint: None,
//! };
//! let store = open_blob_store(&config).await?;
//!
//! if store.list("123.txt").await?.is_empty() {
//!     store
//!         .upload("123.txt", "text/plain", "hello".into())
//!         .await?;
//! }
//! let link = store
//!     .presign_get("123.txt", SystemTime::now(), Duration::from_secs(30 * 60))
//!     .await?;
//! println!("{}", link.url);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod local;
mod presign;
mod s3;
pub mod uri;

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use bytes::Bytes;

pub use config::{BlobStorageConfig, DEFAULT_BUCKET_PATH};
pub use error::{BlobError, BlobResult};
pub use local::LocalBlobStore;
pub use presign::{validate_expiry, PresignedUrl, MAX_PRESIGN_EXPIRY};
pub use s3::S3BlobStore;

/// An object returned by a prefix listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size_bytes: u64,
}

/// Capabilities the service needs from its object store.
///
/// Implementations are shared read-only across concurrent requests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Human readable base location, e.g. `s3://bucket` or `file:///dir`.
    fn location(&self) -> &str;

    /// List objects whose key starts with `prefix`.
    ///
    /// Prefix matching is plain string matching, so `123.txt` also matches
    /// `123.txt.bak`. Zero, one or many results are all valid answers.
    async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectSummary>>;

    /// Upload `body` under `key` in a single request.
    ///
    /// Must be safe to repeat: uploading identical bytes to an existing key
    /// succeeds and leaves the same content in place (last write wins).
    /// Concurrent writers of the same content-addressed key rely on this.
    async fn upload(&self, key: &str, content_type: &str, body: Bytes) -> BlobResult<()>;

    /// Presign a GET request for `key`, valid from `issued_at` for
    /// `expires_in`.
    ///
    /// Does not check that the object exists.
    async fn presign_get(
        &self,
        key: &str,
        issued_at: SystemTime,
        expires_in: Duration,
    ) -> BlobResult<PresignedUrl>;
}

/// Open the backend selected by the scheme of `config.path`.
///
/// - `s3://bucket` → [`S3BlobStore`]
/// - `file:///dir` → [`LocalBlobStore`]
pub async fn open_blob_store(config: &BlobStorageConfig) -> BlobResult<Arc<dyn BlobStore>> {
    if uri::is_s3_uri(&config.path) {
        let region = config.resolve_region()?;
        let store = S3BlobStore::new(&config.path, region, config.endpoint.clone()).await?;
        return Ok(Arc::new(store));
    }
    if uri::is_file_uri(&config.path) {
        let root = uri::file_uri_to_path(&config.path)?;
        let store = LocalBlobStore::new(root).await?;
        return Ok(Arc::new(store));
    }
    Err(BlobError::UnsupportedBackend {
        scheme: uri::scheme(&config.path).unwrap_or_default(),
    })
}
