use bytes::Bytes;

use crate::{
    addresser::{ContentAddresser, ObjectKey},
    error::SecretError,
};

/// Content type every secret is stored with.
pub const SECRET_CONTENT_TYPE: &str = "text/plain";

/// A submitted secret, alive for a single request.
#[derive(Clone)]
pub struct Secret {
    key: ObjectKey,
    data: Bytes,
}

impl Secret {
    /// Address `data`. Empty payloads never reach the backend.
    pub fn new(addresser: &dyn ContentAddresser, data: Bytes) -> Result<Self, SecretError> {
        if data.is_empty() {
            return Err(SecretError::EmptyInput);
        }
        Ok(Self {
            key: addresser.address(&data),
            data,
        })
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("key", &self.key)
            .field("len", &self.data.len())
            .finish()
    }
}
