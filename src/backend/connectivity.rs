//! Connectivity pings
//!
//! The backend can ping a handful of outside targets on our behalf. Each
//! target has its own endpoint; `/api/ping/all` runs them all server-side
//! and returns a summary.

use futures_util::future::join_all;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{fetch, Fields, Outcome};
use crate::api::{ApiClient, ApiResult, Endpoint};

/// A single ping target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingTarget {
    Service,
    Microsoft,
    Github,
    Internet,
    Dns,
    Connectivity,
}

const TARGETS: [PingTarget; 6] = [
    PingTarget::Service,
    PingTarget::Microsoft,
    PingTarget::Github,
    PingTarget::Internet,
    PingTarget::Dns,
    PingTarget::Connectivity,
];

impl PingTarget {
    pub fn all() -> &'static [PingTarget] {
        &TARGETS
    }

    pub fn endpoint(self) -> Endpoint {
        match self {
            PingTarget::Service => Endpoint::Ping,
            PingTarget::Microsoft => Endpoint::PingMicrosoft,
            PingTarget::Github => Endpoint::PingGithub,
            PingTarget::Internet => Endpoint::PingInternet,
            PingTarget::Dns => Endpoint::PingDns,
            PingTarget::Connectivity => Endpoint::PingConnectivity,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            PingTarget::Service => "Ping Service",
            PingTarget::Microsoft => "Microsoft",
            PingTarget::Github => "GitHub",
            PingTarget::Internet => "Internet",
            PingTarget::Dns => "DNS Resolution",
            PingTarget::Connectivity => "Comprehensive Test",
        }
    }
}

impl FromStr for PingTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "service" | "ping" => Ok(PingTarget::Service),
            "microsoft" => Ok(PingTarget::Microsoft),
            "github" => Ok(PingTarget::Github),
            "internet" => Ok(PingTarget::Internet),
            "dns" => Ok(PingTarget::Dns),
            "connectivity" => Ok(PingTarget::Connectivity),
            other => Err(format!(
                "unknown ping target: {} (service, microsoft, github, internet, dns, connectivity)",
                other
            )),
        }
    }
}

impl fmt::Display for PingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result for one pinged URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// "online" or "offline"
    pub status: String,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PingResult {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivitySummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub online: u64,
    #[serde(default)]
    pub offline: u64,
    #[serde(default)]
    pub average_response_time: f64,
}

/// Aggregate report from `/api/ping/all`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    #[serde(default)]
    pub summary: ConnectivitySummary,
    #[serde(default)]
    pub results: Vec<PingResult>,
}

#[derive(Debug, Deserialize)]
struct ReportPayload {
    #[serde(default)]
    data: ConnectivityReport,
}

/// Ping endpoints
pub struct ConnectivityApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ConnectivityApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Ping one target
    pub async fn ping(&self, target: PingTarget) -> ApiResult<Outcome<Fields>> {
        let path = target.endpoint().path()?;
        fetch::<_, ()>(self.client, Method::GET, &path, None).await
    }

    /// Server-side sweep of every target
    pub async fn ping_all(&self) -> ApiResult<Outcome<ConnectivityReport>> {
        let path = Endpoint::PingAll.path()?;
        let outcome: Outcome<ReportPayload> =
            fetch::<_, ()>(self.client, Method::GET, &path, None).await?;
        tracing::info!("Tested {} endpoints", outcome.data.data.results.len());
        Ok(outcome.map(|p| p.data))
    }

    /// Ping every target concurrently from the client, one request each
    pub async fn ping_each(&self) -> Vec<(PingTarget, ApiResult<Outcome<Fields>>)> {
        let pings = PingTarget::all().iter().map(|&target| async move {
            (target, self.ping(target).await)
        });
        join_all(pings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClientError, ApiConfig};
    use crate::test_support::spawn_backend;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn backend() -> Router {
        let ok = || async { Json(json!({"success": true, "message": "pong"})) };
        Router::new()
            .route("/api/ping", get(ok))
            .route("/api/ping/microsoft", get(ok))
            .route("/api/ping/github", get(ok))
            .route("/api/ping/internet", get(ok))
            .route("/api/ping/connectivity", get(ok))
            .route(
                "/api/ping/dns",
                get(|| async { Json(json!({"success": false, "error": "DNS lookup failed"})) }),
            )
            .route(
                "/api/ping/all",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": {
                            "summary": {"total": 2, "online": 1, "offline": 1, "averageResponseTime": 42.5},
                            "results": [
                                {"name": "Microsoft", "url": "https://microsoft.com", "status": "online", "responseTime": 40},
                                {"name": "GitHub", "url": "https://github.com", "status": "offline", "error": "timeout"}
                            ]
                        }
                    }))
                }),
            )
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("GitHub".parse::<PingTarget>().unwrap(), PingTarget::Github);
        assert_eq!("ping".parse::<PingTarget>().unwrap(), PingTarget::Service);
        assert!("ftp".parse::<PingTarget>().is_err());
        assert_eq!(PingTarget::Dns.endpoint().template(), "/api/ping/dns");
    }

    #[tokio::test]
    async fn test_ping_all_report() {
        let client = ApiClient::new(ApiConfig::new(spawn_backend(backend()).await)).unwrap();
        let report = client.connectivity().ping_all().await.unwrap().data;

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.average_response_time, 42.5);
        assert!(report.results[0].is_online());
        assert!(!report.results[1].is_online());
        assert_eq!(report.results[1].error.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn test_ping_each_keeps_individual_failures() {
        let client = ApiClient::new(ApiConfig::new(spawn_backend(backend()).await)).unwrap();
        let results = client.connectivity().ping_each().await;

        assert_eq!(results.len(), PingTarget::all().len());
        for (target, result) in &results {
            match target {
                PingTarget::Dns => assert!(matches!(
                    result,
                    Err(ApiClientError::Backend(m)) if m == "DNS lookup failed"
                )),
                _ => assert_eq!(
                    result.as_ref().unwrap().message.as_deref(),
                    Some("pong")
                ),
            }
        }
    }
}
