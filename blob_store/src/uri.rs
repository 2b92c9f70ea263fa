//! URI parsing utilities for blob store locations.
//!
//! Supports `s3://bucket` and `file:///path` URI schemes.

use std::path::PathBuf;

use crate::{BlobError, BlobResult};

/// Check if a URI uses the `file://` scheme.
pub fn is_file_uri(uri: &str) -> bool {
    uri.starts_with("file://")
}

/// Check if a URI uses the `s3://` scheme.
pub fn is_s3_uri(uri: &str) -> bool {
    uri.starts_with("s3://")
}

/// The scheme part of `scheme://...`, if any.
pub fn scheme(uri: &str) -> Option<String> {
    uri.split_once("://").map(|(scheme, _)| scheme.to_string())
}

/// Extract the bucket name from an S3 location.
///
/// `s3://my-bucket` → `"my-bucket"`. Objects live at the bucket root, so a
/// path component is rejected.
pub fn bucket_from_s3_uri(uri: &str) -> BlobResult<String> {
    let url = url::Url::parse(uri).map_err(|e| BlobError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "s3" {
        return Err(BlobError::InvalidUri {
            uri: uri.to_string(),
            reason: "URI must start with s3://".to_string(),
        });
    }
    let bucket = url
        .host_str()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| BlobError::InvalidUri {
            uri: uri.to_string(),
            reason: "missing bucket name".to_string(),
        })?;
    if !url.path().trim_matches('/').is_empty() {
        return Err(BlobError::InvalidUri {
            uri: uri.to_string(),
            reason: "objects are stored at the bucket root, remove the key prefix".to_string(),
        });
    }
    Ok(bucket.to_string())
}

/// Convert a `file://` URI to a filesystem path.
///
/// `file:///tmp/secrets` → `/tmp/secrets`
pub fn file_uri_to_path(uri: &str) -> BlobResult<PathBuf> {
    let path_str = uri
        .strip_prefix("file://")
        .ok_or_else(|| BlobError::InvalidUri {
            uri: uri.to_string(),
            reason: "URI must start with file://".to_string(),
        })?;
    if path_str.is_empty() {
        return Err(BlobError::InvalidUri {
            uri: uri.to_string(),
            reason: "missing directory".to_string(),
        });
    }
    Ok(PathBuf::from(path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detection() {
        assert!(is_file_uri("file:///tmp/foo"));
        assert!(!is_file_uri("s3://bucket"));
        assert!(is_s3_uri("s3://bucket"));
        assert!(!is_s3_uri("file:///tmp/foo"));
        assert_eq!(scheme("gs://bucket").as_deref(), Some("gs"));
        assert_eq!(scheme("bucket"), None);
    }

    #[test]
    fn test_bucket_from_s3_uri() {
        assert_eq!(
            bucket_from_s3_uri("s3://users-shared-secrets").unwrap(),
            "users-shared-secrets"
        );
        assert_eq!(bucket_from_s3_uri("s3://my-bucket/").unwrap(), "my-bucket");
    }

    #[test]
    fn test_bucket_from_s3_uri_rejects_prefix() {
        assert!(bucket_from_s3_uri("s3://my-bucket/some/prefix").is_err());
    }

    #[test]
    fn test_bucket_from_s3_uri_not_s3() {
        assert!(bucket_from_s3_uri("file:///tmp/foo").is_err());
        assert!(bucket_from_s3_uri("not a uri").is_err());
    }

    #[test]
    fn test_file_uri_to_path() {
        let path = file_uri_to_path("file:///tmp/secrets").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/secrets"));
        assert!(file_uri_to_path("s3://bucket").is_err());
        assert!(file_uri_to_path("file://").is_err());
    }
}
