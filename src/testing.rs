use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
    time::{Duration, SystemTime},
};

use anyhow::Result;
use async_trait::async_trait;
use blob_store::{BlobError, BlobResult, BlobStore, ObjectSummary, PresignedUrl};
use bytes::Bytes;
use tracing::subscriber;
use tracing_subscriber::{layer::SubscriberExt, Layer};

use crate::{
    addresser::{ContentAddresser, ObjectKey},
    config::ServerConfig,
    routes::RouteState,
    service::Service,
};

pub const TEST_BUCKET: &str = "test-bucket";

/// Addresser mapping every payload to the same key, to force collisions.
pub struct ConstantAddresser(pub &'static str);

impl ContentAddresser for ConstantAddresser {
    fn address(&self, _data: &[u8]) -> ObjectKey {
        ObjectKey::from(self.0.to_string())
    }
}

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// In-memory [`BlobStore`] that counts calls and can be told to fail.
///
/// Links look like `https://test-bucket.example/<key>?expires=<unix secs>`.
#[derive(Default)]
pub struct RecordingBlobStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    list_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    presign_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_upload: AtomicBool,
    fail_presign: AtomicBool,
}

impl RecordingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, data: Bytes) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: "text/plain".to_string(),
            },
        );
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).map(|o| o.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub fn fail_upload(&self) {
        self.fail_upload.store(true, Ordering::SeqCst);
    }

    pub fn fail_presign(&self) {
        self.fail_presign.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    fn location(&self) -> &str {
        "s3://test-bucket"
    }

    async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(BlobError::Network {
                source: anyhow::anyhow!("AccessDenied: credentials rejected"),
            });
        }
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                size_bytes: object.data.len() as u64,
            })
            .collect())
    }

    async fn upload(&self, key: &str, content_type: &str, body: Bytes) -> BlobResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(BlobError::Network {
                source: anyhow::anyhow!("SlowDown: please reduce your request rate"),
            });
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presign_get(
        &self,
        key: &str,
        issued_at: SystemTime,
        expires_in: Duration,
    ) -> BlobResult<PresignedUrl> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_presign.load(Ordering::SeqCst) {
            return Err(BlobError::Presign {
                reason: "no credentials to sign with".to_string(),
            });
        }
        let expires = (issued_at + expires_in)
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        Ok(PresignedUrl::new(
            format!("https://{}.example/{}?expires={}", TEST_BUCKET, key, expires),
            issued_at,
            expires_in,
        ))
    }
}

pub struct TestService {
    pub service: Service,
    pub store: Arc<RecordingBlobStore>,
}

impl TestService {
    pub fn new() -> Result<Self> {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Result<Self> {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = subscriber::set_global_default(
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_filter(env_filter)),
        );

        config.validate()?;
        let store = Arc::new(RecordingBlobStore::new());
        let service = Service::with_blob_store(config, store.clone());
        Ok(Self { service, store })
    }

    pub fn route_state(&self) -> RouteState {
        self.service.route_state()
    }
}
