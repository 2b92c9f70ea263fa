//! Dedup-aware storage of secrets and issuance of expiring links.
//!
//! A submission runs `address → exists → (skip | put) → presign`. The
//! existence check and the write are not atomic: two concurrent submissions
//! of the same content may both write. That is accepted, because the key is
//! derived from the content and [`BlobStore::upload`] is required to tolerate
//! identical overwrites. No locking is done here, and none would help across
//! processes anyway.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use blob_store::{BlobStore, PresignedUrl};
use bytes::Bytes;
use tracing::{debug, info};

use crate::{
    addresser::{ContentAddresser, ObjectKey},
    error::SecretError,
    secret::{Secret, SECRET_CONTENT_TYPE},
};

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub key: ObjectKey,
    pub link: PresignedUrl,
    /// False when the object already existed and the write was skipped.
    pub written: bool,
}

/// Stores secrets in a [`BlobStore`] and hands out presigned links.
///
/// Built once at startup and shared read-only by every request.
pub struct SecretStoreGateway {
    store: Arc<dyn BlobStore>,
    addresser: Arc<dyn ContentAddresser>,
    link_ttl: Duration,
}

impl SecretStoreGateway {
    pub fn new(
        store: Arc<dyn BlobStore>,
        addresser: Arc<dyn ContentAddresser>,
        link_ttl: Duration,
    ) -> Self {
        Self {
            store,
            addresser,
            link_ttl,
        }
    }

    /// Whether anything is stored under `key`, via a prefix listing.
    pub async fn exists(&self, key: &ObjectKey) -> Result<bool, SecretError> {
        let objects = self
            .store
            .list(key.as_str())
            .await
            .map_err(|source| SecretError::BackendUnavailable {
                key: key.clone(),
                location: self.store.location().to_string(),
                source,
            })?;
        Ok(!objects.is_empty())
    }

    /// Write the secret. Callers check [`Self::exists`] first.
    pub async fn put(&self, secret: &Secret) -> Result<(), SecretError> {
        self.store
            .upload(
                secret.key().as_str(),
                SECRET_CONTENT_TYPE,
                secret.data().clone(),
            )
            .await
            .map_err(|source| SecretError::WriteFailed {
                key: secret.key().clone(),
                location: self.store.location().to_string(),
                source,
            })
    }

    /// Presign a GET for `key`, valid for `ttl` from now.
    pub async fn presign_get(
        &self,
        key: &ObjectKey,
        ttl: Duration,
    ) -> Result<PresignedUrl, SecretError> {
        self.store
            .presign_get(key.as_str(), SystemTime::now(), ttl)
            .await
            .map_err(|source| SecretError::SigningFailed {
                key: key.clone(),
                location: self.store.location().to_string(),
                source,
            })
    }

    /// Store `data` unless already present and return a fresh link to it.
    ///
    /// Any backend failure aborts the submission; nothing is retried.
    #[tracing::instrument(skip_all, fields(key = tracing::field::Empty, size_bytes = data.len()))]
    pub async fn submit(&self, data: Bytes) -> Result<Submission, SecretError> {
        let secret = Secret::new(self.addresser.as_ref(), data)?;
        tracing::Span::current().record("key", secret.key().as_str());

        let written = if self.exists(secret.key()).await? {
            debug!("object already stored, skipping write");
            false
        } else {
            self.put(&secret).await?;
            true
        };

        let link = self.presign_get(secret.key(), self.link_ttl).await?;
        info!(
            size_bytes = secret.size_bytes(),
            written,
            ttl_secs = self.link_ttl.as_secs(),
            "issued secret link"
        );

        Ok(Submission {
            key: secret.key().clone(),
            link,
            written,
        })
    }
}
