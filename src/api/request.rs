//! Request options
//!
//! Uniform method/header/body triple for outgoing JSON requests. Every
//! request carries the JSON content type and cache-defeating headers; a body
//! is attached only when one is given.

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Method;
use serde::Serialize;

use super::error::ApiResult;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";
pub const PRAGMA_NO_CACHE: &str = "no-cache";

/// Method, headers and optional serialized body of a request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    /// Options without a body
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: vec![
                ("Content-Type", JSON_CONTENT_TYPE),
                ("Cache-Control", NO_CACHE),
                ("Pragma", PRAGMA_NO_CACHE),
            ],
            body: None,
        }
    }

    /// Options with `body` serialized as JSON
    pub fn with_json<B: Serialize + ?Sized>(method: Method, body: &B) -> ApiResult<Self> {
        let mut options = Self::new(method);
        options.body = Some(serde_json::to_string(body)?);
        Ok(options)
    }

    /// Options with an optional body
    pub fn build<B: Serialize + ?Sized>(method: Method, body: Option<&B>) -> ApiResult<Self> {
        match body {
            Some(body) => Self::with_json(method, body),
            None => Ok(Self::new(method)),
        }
    }

    /// Header set as a reqwest header map
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        map.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
        map.insert(PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE));
        map
    }
}
