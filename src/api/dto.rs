//! Response envelope
//!
//! The backend wraps every JSON answer in `{ success, message?, error?, ... }`
//! with the payload fields flattened alongside.

use serde::Deserialize;

use super::error::{ApiClientError, ApiResult};

/// Standard backend response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Payload on success, `Backend` error otherwise
    pub fn into_result(self) -> ApiResult<T> {
        if self.success {
            Ok(self.payload)
        } else {
            Err(ApiClientError::Backend(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ))
        }
    }

    /// Payload and the backend's message on success
    pub fn into_parts(self) -> ApiResult<(T, Option<String>)> {
        let message = self.message.clone();
        self.into_result().map(|payload| (payload, message))
    }
}

/// Best-effort human message from an error body
pub(crate) fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<serde_json::Value>,
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.error {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) if !other.is_null() => Some(other.to_string()),
        _ => parsed.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    #[derive(Debug, Deserialize)]
    struct Items {
        #[serde(default)]
        items: Vec<u32>,
    }

    #[test]
    fn test_success_envelope() {
        let env: Envelope<Items> =
            serde_json::from_str(r#"{"success": true, "message": "ok", "items": [1, 2]}"#)
                .unwrap();
        let (items, message) = env.into_parts().unwrap();
        assert_eq!(items.items, vec![1, 2]);
        assert_eq!(message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_failure_envelope_prefers_error() {
        let env: Envelope<Items> =
            serde_json::from_str(r#"{"success": false, "error": "boom", "message": "m"}"#)
                .unwrap();
        match env.into_result() {
            Err(ApiClientError::Backend(msg)) => assert_eq!(msg, "boom"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_success_is_failure() {
        let env: Envelope<Map<String, Value>> = serde_json::from_str(r#"{"data": 1}"#).unwrap();
        assert!(env.into_result().is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"success": false, "error": "Not found"}"#).as_deref(),
            Some("Not found")
        );
        assert_eq!(
            error_message(r#"{"message": "Bad input"}"#).as_deref(),
            Some("Bad input")
        );
        assert_eq!(
            error_message(r#"{"error": {"code": "X"}}"#).as_deref(),
            Some(r#"{"code":"X"}"#)
        );
        assert_eq!(error_message("<html>"), None);
    }
}
