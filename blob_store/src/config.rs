//! Blob storage configuration.

use std::env;

use serde::{Deserialize, Serialize};

use crate::{BlobError, BlobResult};

/// Bucket used when no storage path is configured.
pub const DEFAULT_BUCKET_PATH: &str = "s3://users-shared-secrets";

/// Configuration for blob storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlobStorageConfig {
    /// Storage location: `s3://bucket` or `file:///path`.
    #[serde(default = "default_blob_store_path")]
    pub path: String,

    /// AWS region (for S3). Falls back to `AWS_REGION`.
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack).
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            path: default_blob_store_path(),
            region: None,
            endpoint: None,
        }
    }
}

fn default_blob_store_path() -> String {
    DEFAULT_BUCKET_PATH.to_string()
}

impl BlobStorageConfig {
    /// The region to sign requests for.
    ///
    /// An explicit `region` wins over the `AWS_REGION` environment variable.
    /// Having neither is a configuration error.
    pub fn resolve_region(&self) -> BlobResult<String> {
        resolve_region(self.region.as_deref(), env::var("AWS_REGION").ok())
    }
}

fn resolve_region(configured: Option<&str>, from_env: Option<String>) -> BlobResult<String> {
    configured
        .filter(|r| !r.trim().is_empty())
        .map(str::to_string)
        .or(from_env.filter(|r| !r.trim().is_empty()))
        .ok_or_else(|| BlobError::Config {
            reason: "missing env AWS_REGION".to_string(),
        })
}
