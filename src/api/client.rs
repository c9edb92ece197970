//! Backend REST API Client
//!
//! HTTP client for the Kinyu backend. Each call builds its URL with a fresh
//! cache-busting stamp and runs under its own deadline; when the deadline
//! elapses the in-flight request is dropped and the caller gets
//! [`ApiClientError::Timeout`].

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Instant;

use super::config::ApiConfig;
use super::dto::{error_message, Envelope};
use super::endpoints::Endpoint;
use super::error::{ApiClientError, ApiResult};
use super::probe::{ConnectionStatus, ProbeReport};
use super::request::RequestOptions;

/// Kinyu backend client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client with the given configuration
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let http = Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run `fut` under this client's request deadline
    async fn with_deadline<T, F>(&self, url: &str, fut: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.config.timeout(), fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Request to {} cancelled after {} ms",
                    url,
                    self.config.timeout_ms
                );
                Err(ApiClientError::Timeout(self.config.timeout_ms))
            }
        };

        if self.config.debug {
            tracing::debug!(
                url = %url,
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = result.is_ok(),
                "Request finished"
            );
        }
        result
    }

    /// Send a request and return the raw response, whatever its status
    async fn dispatch(&self, url: &str, options: RequestOptions) -> ApiResult<Response> {
        if self.config.debug {
            tracing::debug!("{} {}", options.method, url);
        }

        let mut request = self
            .http
            .request(options.method.clone(), url)
            .headers(options.header_map());
        if let Some(body) = options.body {
            request = request.body(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiClientError::from_transport(e, self.config.timeout_ms))
    }

    /// Turn a non-success status into `ApiClientError::Status`
    async fn check_status(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text)
            .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

        Err(ApiClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let text = response
            .text()
            .await
            .map_err(|e| ApiClientError::from_transport(e, self.config.timeout_ms))?;
        serde_json::from_str(&text).map_err(|e| ApiClientError::Decode(e.to_string()))
    }

    /// Send a JSON request to `path` and decode the JSON response
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.url(path)?;
        let options = RequestOptions::build(method, body)?;

        self.with_deadline(&url, async {
            let response = self.dispatch(&url, options).await?;
            let response = self.check_status(response).await?;
            self.decode(response).await
        })
        .await
    }

    /// Send a JSON request and unwrap the backend envelope
    pub async fn call<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<Envelope<T>, B>(method, path, body)
            .await?
            .into_result()
    }

    /// GET `path` as JSON
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// GET `path` as raw bytes
    pub async fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let url = self.config.url(path)?;

        self.with_deadline(&url, async {
            let response = self.dispatch(&url, RequestOptions::default()).await?;
            let response = self.check_status(response).await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ApiClientError::from_transport(e, self.config.timeout_ms))?;
            Ok(bytes.to_vec())
        })
        .await
    }

    /// POST a single file as multipart form data under the `file` field
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<T> {
        let url = self.config.url(path)?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        if self.config.debug {
            tracing::debug!("POST {} (multipart, {})", url, file_name);
        }

        self.with_deadline(&url, async {
            let response = self
                .http
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(|e| ApiClientError::from_transport(e, self.config.timeout_ms))?;
            let response = self.check_status(response).await?;
            self.decode(response).await
        })
        .await
    }

    /// GET the health endpoint, succeeding only on a 2xx status
    async fn health_status(&self) -> ApiResult<()> {
        let url = self.config.endpoint_url(Endpoint::Health)?;

        self.with_deadline(&url, async {
            let response = self.dispatch(&url, RequestOptions::default()).await?;
            self.check_status(response).await.map(|_| ())
        })
        .await
    }

    /// Whether the backend answers its health check successfully
    pub async fn check_connection(&self) -> bool {
        match self.health_status().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("API connection test failed: {}", e);
                false
            }
        }
    }

    /// Timed health check that keeps the failure reason
    pub async fn probe(&self) -> ProbeReport {
        let started = Instant::now();
        let result = self.health_status().await;
        let response_time_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(()) => ProbeReport {
                status: ConnectionStatus::Success,
                response_time_ms,
                last_error: None,
            },
            Err(e) => ProbeReport {
                status: if e.is_timeout() {
                    ConnectionStatus::Timeout
                } else {
                    ConnectionStatus::Error
                },
                response_time_ms,
                last_error: Some(e.to_string()),
            },
        }
    }
}
