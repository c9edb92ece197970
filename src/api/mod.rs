//! Kinyu Backend API Client
//!
//! Everything needed to talk to the dashboard backend consistently from
//! every call site.
//!
//! # Components
//!
//! - [`ApiConfig`]: base URL, timeout, debug flag, cache-busting URLs
//! - [`Endpoint`]: registry of backend path templates
//! - [`RequestOptions`]: JSON + no-cache headers and optional body
//! - [`ApiClient`]: reqwest client with a per-request deadline
//!
//! # Example
//!
//! ```rust,no_run
//! use kinyu::api::{ApiClient, ApiConfig, Endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ApiConfig::new("http://localhost:3001").timeout_ms(5_000))?;
//!
//!     if client.check_connection().await {
//!         let health: serde_json::Value =
//!             client.get_json(&Endpoint::HealthDetailed.path()?).await?;
//!         println!("{}", health);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod dto;
mod endpoints;
mod error;
mod probe;
mod request;

pub use client::ApiClient;
pub use config::{ApiConfig, CACHE_BUST_PARAM, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use dto::Envelope;
pub use endpoints::Endpoint;
pub use error::{ApiClientError, ApiResult, UploadRejection};
pub use probe::{ConnectionStatus, ProbeReport};
pub use request::RequestOptions;
