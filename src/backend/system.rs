//! Health and service information
//!
//! Health routes answer with bare JSON rather than the `success` envelope,
//! so they are read with `get_json` and handed back as-is.

use reqwest::Method;
use serde_json::Value;

use super::{fetch, Fields, Outcome};
use crate::api::{ApiClient, ApiResult, Endpoint};

pub struct SystemApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SystemApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Basic or detailed health report
    pub async fn health(&self, detailed: bool) -> ApiResult<Value> {
        let endpoint = if detailed {
            Endpoint::HealthDetailed
        } else {
            Endpoint::Health
        };
        self.client.get_json(&endpoint.path()?).await
    }

    pub async fn readiness(&self) -> ApiResult<Value> {
        self.client.get_json(&Endpoint::HealthReadiness.path()?).await
    }

    pub async fn liveness(&self) -> ApiResult<Value> {
        self.client.get_json(&Endpoint::HealthLiveness.path()?).await
    }

    /// Service name, version and route listing from `/api`
    pub async fn api_info(&self) -> ApiResult<Value> {
        self.client.get_json(&Endpoint::ApiInfo.path()?).await
    }

    pub async fn auth_status(&self) -> ApiResult<Outcome<Fields>> {
        let path = Endpoint::AuthStatus.path()?;
        fetch::<_, ()>(self.client, Method::GET, &path, None).await
    }

    /// Storage access through the backend's managed identity
    pub async fn managed_identity(&self) -> ApiResult<Outcome<Fields>> {
        let path = Endpoint::StorageManagedIdentity.path()?;
        fetch::<_, ()>(self.client, Method::GET, &path, None).await
    }
}
