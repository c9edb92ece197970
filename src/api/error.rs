//! API Client Error Types
//!
//! Every backend call fails in one of a few coarse ways: the transport
//! broke, the server answered with a non-success status, the request ran out
//! of time, the body was not what we expected, or the backend said
//! `success: false`. None of these are retried here.

use std::fmt;
use thiserror::Error;

/// Errors returned by the API client
#[derive(Error, Debug)]
pub enum ApiClientError {
    /// Backend could not be reached (connection refused, DNS, TLS)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Transport-level request failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Request was cancelled because its deadline elapsed
    #[error("Request timeout after {0} ms")]
    Timeout(u64),

    /// Response body was malformed or had an unexpected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Backend answered but reported `success: false`
    #[error("{0}")]
    Backend(String),

    /// Endpoint path still contains a `:name` segment
    #[error("Unresolved placeholder in endpoint path: {0}")]
    UnresolvedPlaceholder(String),

    /// Endpoint was used in a way its template does not allow
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Local file rejected before upload
    #[error("Invalid upload: {file}: {reason}")]
    InvalidUpload { file: String, reason: UploadRejection },

    /// Request input rejected before anything was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local IO error (reading upload files, writing downloads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiClientError {
    /// Classify a reqwest error the same way everywhere
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ApiClientError::Timeout(timeout_ms)
        } else if err.is_connect() {
            ApiClientError::Unavailable(err.to_string())
        } else if err.is_decode() {
            ApiClientError::Decode(err.to_string())
        } else {
            ApiClientError::Request(err)
        }
    }

    /// True when the request was aborted by its deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiClientError::Timeout(_))
    }
}

/// Why a local file was refused before upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    UnsupportedType,
    TooLarge,
}

impl UploadRejection {
    /// Translation key explaining the accepted files
    pub fn label_key(self) -> &'static str {
        match self {
            UploadRejection::UnsupportedType => "fileUpload.supportedFormats",
            UploadRejection::TooLarge => "fileUpload.maxSize",
        }
    }
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::UnsupportedType => f.write_str("unsupported file type"),
            UploadRejection::TooLarge => f.write_str("larger than 10 MB"),
        }
    }
}

/// Result type alias for API client operations
pub type ApiResult<T> = Result<T, ApiClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiClientError::Status {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let err = ApiClientError::Timeout(30000);
        assert_eq!(err.to_string(), "Request timeout after 30000 ms");
        assert!(err.is_timeout());

        let err = ApiClientError::Backend("Todo not found".to_string());
        assert_eq!(err.to_string(), "Todo not found");
        assert!(!err.is_timeout());

        let err = ApiClientError::InvalidUpload {
            file: "archive.zip".to_string(),
            reason: UploadRejection::UnsupportedType,
        };
        assert_eq!(err.to_string(), "Invalid upload: archive.zip: unsupported file type");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ApiClientError = json_err.into();
        assert!(matches!(err, ApiClientError::Serialization(_)));
    }
}
