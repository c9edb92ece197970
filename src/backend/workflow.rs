//! Logic App workflow checks

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{fetch, Fields, Outcome};
use crate::api::{ApiClient, ApiResult, Endpoint};

/// What the Logic App proxy returns for a table listing or a test call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicAppResult {
    #[serde(default)]
    pub tables: Option<Vec<Value>>,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl LogicAppResult {
    pub fn table_count(&self) -> usize {
        self.tables.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Deserialize)]
struct ResultPayload {
    #[serde(default)]
    data: LogicAppResult,
}

/// Logic App endpoints
pub struct WorkflowApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WorkflowApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Configuration status of the workflow integration
    pub async fn status(&self) -> ApiResult<Outcome<Fields>> {
        let path = Endpoint::LogicAppStatus.path()?;
        fetch::<_, ()>(self.client, Method::GET, &path, None).await
    }

    /// Trigger a test run through the documents service
    pub async fn test(&self) -> ApiResult<Outcome<Fields>> {
        let path = Endpoint::LogicAppTest.path()?;
        fetch::<_, ()>(self.client, Method::POST, &path, None).await
    }

    /// List tables through the proxy
    pub async fn tables(&self) -> ApiResult<Outcome<LogicAppResult>> {
        let path = Endpoint::LogicAppProxyTables.path()?;
        let outcome: Outcome<ResultPayload> =
            fetch::<_, ()>(self.client, Method::GET, &path, None).await?;
        let outcome = outcome.map(|p| p.data);
        tracing::info!(tables = outcome.data.table_count(), "Retrieved Logic App tables");
        Ok(outcome)
    }

    /// Connectivity test through the proxy
    pub async fn proxy_test(&self) -> ApiResult<Outcome<LogicAppResult>> {
        let path = Endpoint::LogicAppProxyTest.path()?;
        let outcome: Outcome<ResultPayload> =
            fetch::<_, ()>(self.client, Method::POST, &path, None).await?;
        Ok(outcome.map(|p| p.data))
    }
}
