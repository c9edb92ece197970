//! # Kinyu Client
//!
//! Client library and CLI for the Kinyu dashboard backend: localized text for
//! the `vi`, `en` and `ja` interfaces plus a typed HTTP client for the
//! documents, todos, connectivity and workflow services.
//!
//! ## Modules
//!
//! - [`i18n`]: Locale catalogs, key resolution and the persisted language choice
//! - [`api`]: Base URL and endpoint registry, request options, HTTP client
//! - [`backend`]: Typed wrappers over the backend's REST endpoints
//! - [`config`]: TOML file and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kinyu::{ApiClient, Catalogs, Config, LanguageContext, TodoFilter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let client = ApiClient::new(config.api_config())?;
//!     let lang = LanguageContext::load(
//!         Arc::new(Catalogs::embedded()?),
//!         Arc::new(config.locale_store()),
//!     );
//!
//!     if client.check_connection().await {
//!         let todos = client.todos().list(&TodoFilter::default()).await?;
//!         println!("{}: {}", lang.t("todos.title"), todos.data.len());
//!     } else {
//!         println!("{}", lang.t("debugger.connectionError"));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod i18n;

#[cfg(test)]
mod test_support;

pub use api::{
    ApiClient, ApiClientError, ApiConfig, ApiResult, ConnectionStatus, Endpoint, Envelope,
    ProbeReport, RequestOptions,
};

pub use backend::{
    BulkAction, ConnectivityReport, Document, DocumentStats, Outcome, PingTarget, Priority, Todo,
    TodoFilter, TodoInput, TodoStats, TodoUpdate,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use i18n::{Catalogs, I18nError, LanguageContext, Locale, LocaleStore};
