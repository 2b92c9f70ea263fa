//! S3 blob store backend using aws-sdk-s3.

use std::time::{Duration, SystemTime};

use anyhow::anyhow;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    error::DisplayErrorContext,
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client as S3Client,
};
use bytes::Bytes;
use tracing::debug;

use crate::{
    presign::validate_expiry,
    uri::bucket_from_s3_uri,
    BlobError,
    BlobResult,
    BlobStore,
    ObjectSummary,
    PresignedUrl,
};

/// S3 blob store backend. Objects live directly at the bucket root.
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    location: String,
}

impl S3BlobStore {
    /// Create a new S3 blob store.
    ///
    /// `path` must be `s3://bucket`. When `endpoint` is set the client talks
    /// to that endpoint with path-style addressing, as MinIO and LocalStack
    /// require.
    pub async fn new(path: &str, region: String, endpoint: Option<String>) -> BlobResult<Self> {
        let bucket = bucket_from_s3_uri(path)?;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;
        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = endpoint {
            debug!(endpoint = %endpoint_url, "using custom S3 endpoint");
            s3_config = s3_config.endpoint_url(endpoint_url).force_path_style(true);
        }
        let client = S3Client::from_conf(s3_config.build());

        debug!(bucket = %bucket, "created S3 blob store");
        Ok(Self::from_client(client, bucket))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: S3Client, bucket: String) -> Self {
        Self {
            location: format!("s3://{}", bucket),
            client,
            bucket,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn location(&self) -> &str {
        &self.location
    }

    async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectSummary>> {
        // The first page is enough to tell presence from absence.
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| BlobError::Network {
                source: anyhow!(
                    "S3 list_objects_v2 failed for s3://{}/{}: {}",
                    self.bucket,
                    prefix,
                    DisplayErrorContext(&e)
                ),
            })?;

        let objects = resp
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size_bytes: object
                    .size()
                    .and_then(|s| u64::try_from(s).ok())
                    .unwrap_or(0),
            })
            .collect::<Vec<_>>();
        debug!(bucket = %self.bucket, prefix, matches = objects.len(), "listed objects");
        Ok(objects)
    }

    async fn upload(&self, key: &str, content_type: &str, body: Bytes) -> BlobResult<()> {
        let size_bytes = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| BlobError::Network {
                source: anyhow!(
                    "S3 put_object failed for s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ),
            })?;

        debug!(bucket = %self.bucket, key, size_bytes, "uploaded object");
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        issued_at: SystemTime,
        expires_in: Duration,
    ) -> BlobResult<PresignedUrl> {
        validate_expiry(expires_in).map_err(|reason| BlobError::Presign { reason })?;

        let presigning = PresigningConfig::builder()
            .start_time(issued_at)
            .expires_in(expires_in)
            .build()
            .map_err(|e| BlobError::Presign {
                reason: format!("failed to build presigning config: {}", e),
            })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| BlobError::Presign {
                reason: format!(
                    "failed to presign GET for s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ),
            })?;

        Ok(PresignedUrl::new(
            request.uri().to_string(),
            issued_at,
            expires_in,
        ))
    }
}

impl std::fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}
