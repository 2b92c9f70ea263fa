use blob_store::BlobError;

use crate::addresser::ObjectKey;

/// Every way a submission can fail.
///
/// Rendered to text only at the response boundary, see
/// [`crate::http_objects::ApiError`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SecretError {
    #[error("received empty request")]
    EmptyInput,

    #[error("could not read request body: {reason}")]
    PayloadRejected { reason: String },

    #[error("failed to check for {key} in {location}: {source}")]
    BackendUnavailable {
        key: ObjectKey,
        location: String,
        source: BlobError,
    },

    #[error("failed to upload file {key} to {location}")]
    WriteFailed {
        key: ObjectKey,
        location: String,
        source: BlobError,
    },

    #[error("failed to sign request for obj {location}/{key}")]
    SigningFailed {
        key: ObjectKey,
        location: String,
        source: BlobError,
    },
}

impl SecretError {
    /// Failures the client can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::PayloadRejected { .. })
    }
}
