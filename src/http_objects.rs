use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::SecretError;

/// Which HTTP status failed submissions are answered with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    /// Always 200; clients read the `error:` prefix of the body.
    #[default]
    AlwaysOk,
    /// 4xx for bad requests, 5xx for backend failures.
    Semantic,
}

impl ErrorStatus {
    pub fn status_for(&self, err: &SecretError) -> StatusCode {
        match self {
            ErrorStatus::AlwaysOk => StatusCode::OK,
            ErrorStatus::Semantic => match err {
                SecretError::EmptyInput | SecretError::PayloadRejected { .. } => {
                    StatusCode::BAD_REQUEST
                }
                SecretError::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                SecretError::WriteFailed { .. } => StatusCode::BAD_GATEWAY,
                SecretError::SigningFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// How failures are rendered back to clients.
#[derive(Debug, Clone)]
pub struct ResponseSettings {
    pub error_status: ErrorStatus,
    usage: String,
}

impl ResponseSettings {
    pub fn new(public_url: &str, error_status: ErrorStatus) -> Self {
        Self {
            error_status,
            usage: usage_banner(public_url),
        }
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }
}

/// Help text appended to every failure.
pub fn usage_banner(public_url: &str) -> String {
    format!(
        "\nUsage examples:\n\
         # from stdin\n\
         - echo 'somesecret' | curl --data-binary @- {public_url}\n\
         # from file: aws_user_secrets\n\
         - curl --data-binary @aws_user_secrets {public_url}\n"
    )
}

#[derive(Debug)]
pub struct ApiError {
    error: SecretError,
    status_code: StatusCode,
    usage: String,
}

impl ApiError {
    pub fn new(error: SecretError, settings: &ResponseSettings) -> Self {
        Self {
            status_code: settings.error_status.status_for(&error),
            usage: settings.usage().to_string(),
            error,
        }
    }

    pub fn body(&self) -> String {
        format!("error: {}{}", self.error, self.usage)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_client_error() {
            warn!("rejected request: {}", self.error);
        } else {
            error!(status = %self.status_code, "request failed: {:?}", self.error);
        }
        let body = self.body();
        (self.status_code, body).into_response()
    }
}

/// A presigned link, returned as one line of text.
#[derive(Debug)]
pub struct LinkResponse(pub String);

impl IntoResponse for LinkResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, format!("{}\n", self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use blob_store::BlobError;

    use super::*;
    use crate::addresser::ObjectKey;

    fn backend_failure() -> BlobError {
        BlobError::from(std::io::Error::other("connection reset"))
    }

    fn key() -> ObjectKey {
        ObjectKey::from("42.txt".to_string())
    }

    #[test]
    fn test_usage_banner_names_public_url() {
        let banner = usage_banner("https://secrets.example.com");
        assert_eq!(
            banner,
            "\nUsage examples:\n# from stdin\n- echo 'somesecret' | curl --data-binary @- https://secrets.example.com\n# from file: aws_user_secrets\n- curl --data-binary @aws_user_secrets https://secrets.example.com\n"
        );
    }

    #[test]
    fn test_failure_body_is_message_then_usage() {
        let settings = ResponseSettings::new("https://s.example", ErrorStatus::AlwaysOk);
        let err = ApiError::new(SecretError::EmptyInput, &settings);
        assert!(err
            .body()
            .starts_with("error: received empty request\nUsage examples:\n"));
        assert_eq!(err.status_code, StatusCode::OK);
    }

    #[test]
    fn test_always_ok_hides_failure_kind() {
        let policy = ErrorStatus::AlwaysOk;
        let err = SecretError::BackendUnavailable {
            key: key(),
            location: "s3://b".to_string(),
            source: backend_failure(),
        };
        assert_eq!(policy.status_for(&err), StatusCode::OK);
    }

    #[test]
    fn test_semantic_status_mapping() {
        let policy = ErrorStatus::Semantic;
        assert_eq!(
            policy.status_for(&SecretError::EmptyInput),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            policy.status_for(&SecretError::PayloadRejected {
                reason: "too large".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            policy.status_for(&SecretError::BackendUnavailable {
                key: key(),
                location: "s3://b".to_string(),
                source: backend_failure(),
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            policy.status_for(&SecretError::WriteFailed {
                key: key(),
                location: "s3://b".to_string(),
                source: backend_failure(),
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            policy.status_for(&SecretError::SigningFailed {
                key: key(),
                location: "s3://b".to_string(),
                source: backend_failure(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_status_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            error_status: ErrorStatus,
        }
        let parsed: Wrapper = figment::Figment::new()
            .merge(figment::providers::Serialized::default(
                "error_status",
                "semantic",
            ))
            .extract()
            .unwrap();
        assert_eq!(parsed.error_status, ErrorStatus::Semantic);
    }
}
