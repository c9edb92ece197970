//! Connectivity probe results

use serde::Serialize;

/// Outcome of a timed health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Success,
    Error,
    Timeout,
}

impl ConnectionStatus {
    /// Translation key describing this status
    pub fn label_key(self) -> &'static str {
        match self {
            ConnectionStatus::Success => "debugger.connectionSuccess",
            ConnectionStatus::Error => "debugger.connectionError",
            ConnectionStatus::Timeout => "debugger.timeout",
        }
    }
}

/// Diagnostic result of [`ApiClient::probe`](super::ApiClient::probe)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    pub status: ConnectionStatus,
    pub response_time_ms: u64,
    pub last_error: Option<String>,
}

impl ProbeReport {
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_keys() {
        assert_eq!(
            ConnectionStatus::Timeout.label_key(),
            "debugger.timeout"
        );
        assert_eq!(
            ConnectionStatus::Success.label_key(),
            "debugger.connectionSuccess"
        );
    }

    #[test]
    fn test_report_serialization() {
        let report = ProbeReport {
            status: ConnectionStatus::Timeout,
            response_time_ms: 120,
            last_error: Some("Request timeout after 100 ms".to_string()),
        };
        assert!(!report.is_connected());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "timeout");
        assert_eq!(json["responseTimeMs"], 120);
    }
}
