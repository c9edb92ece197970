//! Endpoint Registry
//!
//! Symbolic names for every backend path the dashboard calls. Some templates
//! carry a single placeholder segment (`:id` or `:name`) that must be filled
//! with [`Endpoint::with_id`] before a URL can be built.

use std::fmt::Display;

use super::error::{ApiClientError, ApiResult};

/// Backend endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Health & status
    Health,
    HealthDetailed,
    HealthReadiness,
    HealthLiveness,
    HealthConnectivity,
    HealthNetwork,

    // System information
    ApiInfo,
    AuthTest,
    AuthStatus,
    AuthMe,
    StorageManagedIdentity,

    // Ping & connectivity
    Ping,
    PingAll,
    PingMicrosoft,
    PingGithub,
    PingInternet,
    PingDns,
    PingConnectivity,

    // Documents
    Documents,
    Document,
    DocumentsUpload,
    DocumentsUploadMultiple,
    DocumentsStats,
    DocumentsDownload,
    DocumentsProcess,
    DocumentsBulkProcess,
    DocumentsSas,

    // Todos
    Todos,
    Todo,
    TodosStats,
    TodosToggle,
    TodosBulk,

    // Workflow (Logic App)
    LogicAppStatus,
    LogicAppTest,
    LogicAppProxyTables,
    LogicAppProxyTest,
}

const ALL: [Endpoint; 36] = [
    Endpoint::Health,
    Endpoint::HealthDetailed,
    Endpoint::HealthReadiness,
    Endpoint::HealthLiveness,
    Endpoint::HealthConnectivity,
    Endpoint::HealthNetwork,
    Endpoint::ApiInfo,
    Endpoint::AuthTest,
    Endpoint::AuthStatus,
    Endpoint::AuthMe,
    Endpoint::StorageManagedIdentity,
    Endpoint::Ping,
    Endpoint::PingAll,
    Endpoint::PingMicrosoft,
    Endpoint::PingGithub,
    Endpoint::PingInternet,
    Endpoint::PingDns,
    Endpoint::PingConnectivity,
    Endpoint::Documents,
    Endpoint::Document,
    Endpoint::DocumentsUpload,
    Endpoint::DocumentsUploadMultiple,
    Endpoint::DocumentsStats,
    Endpoint::DocumentsDownload,
    Endpoint::DocumentsProcess,
    Endpoint::DocumentsBulkProcess,
    Endpoint::DocumentsSas,
    Endpoint::Todos,
    Endpoint::Todo,
    Endpoint::TodosStats,
    Endpoint::TodosToggle,
    Endpoint::TodosBulk,
    Endpoint::LogicAppStatus,
    Endpoint::LogicAppTest,
    Endpoint::LogicAppProxyTables,
    Endpoint::LogicAppProxyTest,
];

impl Endpoint {
    /// Every registered endpoint
    pub fn all() -> &'static [Endpoint] {
        &ALL
    }

    /// Path template, possibly containing a placeholder segment
    pub fn template(self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::HealthDetailed => "/health/detailed",
            Endpoint::HealthReadiness => "/health/readiness",
            Endpoint::HealthLiveness => "/health/liveness",
            Endpoint::HealthConnectivity => "/health/connectivity",
            Endpoint::HealthNetwork => "/health/network",

            Endpoint::ApiInfo => "/api",
            Endpoint::AuthTest => "/api/auth/test",
            Endpoint::AuthStatus => "/api/auth/status",
            Endpoint::AuthMe => "/api/auth/me",
            Endpoint::StorageManagedIdentity => "/api/storage/test-mi",

            Endpoint::Ping => "/api/ping",
            Endpoint::PingAll => "/api/ping/all",
            Endpoint::PingMicrosoft => "/api/ping/microsoft",
            Endpoint::PingGithub => "/api/ping/github",
            Endpoint::PingInternet => "/api/ping/internet",
            Endpoint::PingDns => "/api/ping/dns",
            Endpoint::PingConnectivity => "/api/ping/connectivity",

            Endpoint::Documents => "/api/documents",
            Endpoint::Document => "/api/documents/:id",
            Endpoint::DocumentsUpload => "/api/documents/upload",
            Endpoint::DocumentsUploadMultiple => "/api/documents/upload/multiple",
            Endpoint::DocumentsStats => "/api/documents/stats",
            Endpoint::DocumentsDownload => "/api/documents/:id/download",
            Endpoint::DocumentsProcess => "/api/documents/:id/process",
            Endpoint::DocumentsBulkProcess => "/api/documents/bulk/process",
            Endpoint::DocumentsSas => "/api/documents/sas/:name",

            Endpoint::Todos => "/api/todos",
            Endpoint::Todo => "/api/todos/:id",
            Endpoint::TodosStats => "/api/todos/stats",
            Endpoint::TodosToggle => "/api/todos/:id/toggle",
            Endpoint::TodosBulk => "/api/todos/bulk",

            Endpoint::LogicAppStatus => "/api/documents/logic-app/status",
            Endpoint::LogicAppTest => "/api/documents/logic-app/test",
            Endpoint::LogicAppProxyTables => "/api/logicapp-proxy/tables",
            Endpoint::LogicAppProxyTest => "/api/logicapp-proxy/test",
        }
    }

    /// Placeholder token in the template, if any
    pub fn placeholder(self) -> Option<&'static str> {
        self.template()
            .split('/')
            .find(|segment| segment.starts_with(':'))
    }

    /// Concrete path for an endpoint without a placeholder
    pub fn path(self) -> ApiResult<String> {
        match self.placeholder() {
            None => Ok(self.template().to_string()),
            Some(_) => Err(ApiClientError::UnresolvedPlaceholder(
                self.template().to_string(),
            )),
        }
    }

    /// Fill the placeholder segment with `id` (percent-encoded)
    pub fn with_id(self, id: impl Display) -> ApiResult<String> {
        let placeholder = self.placeholder().ok_or_else(|| {
            ApiClientError::InvalidEndpoint(format!(
                "{} does not take an identifier",
                self.template()
            ))
        })?;

        let id = id.to_string();
        if id.is_empty() {
            return Err(ApiClientError::InvalidEndpoint(format!(
                "empty identifier for {}",
                self.template()
            )));
        }

        Ok(self
            .template()
            .replacen(placeholder, &urlencoding::encode(&id), 1))
    }
}
