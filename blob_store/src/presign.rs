//! Presigned URL structures for direct client access.

use std::time::{Duration, SystemTime};

/// A presigned GET URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// The presigned URL.
    pub url: String,

    /// When the signature starts being valid.
    pub issued_at: SystemTime,

    /// Validity window starting at `issued_at`.
    pub expires_in: Duration,
}

impl PresignedUrl {
    pub fn new(url: String, issued_at: SystemTime, expires_in: Duration) -> Self {
        Self {
            url,
            issued_at,
            expires_in,
        }
    }

    /// The instant after which the URL is rejected.
    pub fn expires_at(&self) -> SystemTime {
        self.issued_at + self.expires_in
    }
}

/// Maximum presigned URL expiry (7 days for S3).
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Validate presigned URL expiry duration.
pub fn validate_expiry(expires_in: Duration) -> Result<(), String> {
    if expires_in > MAX_PRESIGN_EXPIRY {
        Err(format!(
            "expiry duration {:?} exceeds maximum allowed {:?}",
            expires_in, MAX_PRESIGN_EXPIRY
        ))
    } else if expires_in.is_zero() {
        Err("expiry duration must be greater than zero".to_string())
    } else {
        Ok(())
    }
}
