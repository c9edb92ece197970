//! API Client Configuration
//!
//! Base URL, per-request timeout, debug toggle, and cache-busting URL
//! construction shared by every call site.

use regex::Regex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use super::endpoints::Endpoint;
use super::error::{ApiClientError, ApiResult};

/// Backend used when no override is configured
pub const DEFAULT_BASE_URL: &str = "https://app-officialhrpoke-kinyu-japaneast-002.azurewebsites.net";

/// Default per-request timeout (ms)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Query parameter carrying the cache-busting stamp
pub const CACHE_BUST_PARAM: &str = "t";

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Log every request at debug level
    pub debug: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            debug: false,
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().base_url(base_url)
    }

    /// Set the base URL (trailing slashes are trimmed)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full URL for a relative path, with a fresh cache-busting parameter
    ///
    /// Fails if the path still contains a placeholder segment.
    pub fn url(&self, path: &str) -> ApiResult<String> {
        ensure_resolved(path)?;

        let separator = if path.contains('?') { '&' } else { '?' };
        Ok(format!(
            "{}{}{}{}={}",
            self.base_url,
            path,
            separator,
            CACHE_BUST_PARAM,
            next_cache_stamp()
        ))
    }

    /// URL for an endpoint that takes no identifier
    pub fn endpoint_url(&self, endpoint: Endpoint) -> ApiResult<String> {
        self.url(&endpoint.path()?)
    }

    /// URL without the cache-busting parameter, for display
    pub fn display_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(^|/):[A-Za-z_][A-Za-z0-9_]*(/|$)").expect("placeholder pattern is valid")
    })
}

/// Reject paths that still contain a `:name` segment
fn ensure_resolved(path: &str) -> ApiResult<()> {
    let route = path.split('?').next().unwrap_or(path);
    if placeholder_pattern().is_match(route) {
        return Err(ApiClientError::UnresolvedPlaceholder(path.to_string()));
    }
    Ok(())
}

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Current time in milliseconds, strictly increasing within the process
fn next_cache_stamp() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}
