//! Backend Services
//!
//! Typed wrappers over the REST endpoints the dashboard uses. Every call is
//! fire-once: failures are returned to the caller, which decides whether to
//! report them and whether to try again.
//!
//! ## Services
//!
//! - **Todos**: CRUD, toggle, bulk actions, statistics
//! - **Documents**: list, statistics, upload, download, delete, SAS URLs
//! - **Connectivity**: ping targets individually or all at once
//! - **Workflow**: Logic App status, test and table listing
//! - **System**: health, API info, managed identity check

mod connectivity;
mod documents;
mod system;
mod todos;
mod workflow;

pub use connectivity::{
    ConnectivityApi, ConnectivityReport, ConnectivitySummary, PingResult, PingTarget,
};
pub use documents::{
    validate_upload, Document, DocumentList, DocumentStats, DocumentsApi, SasUrl, UploadReceipt,
    MAX_UPLOAD_BYTES,
};
pub use system::SystemApi;
pub use todos::{
    BulkAction, Priority, Todo, TodoFilter, TodoInput, TodoStats, TodoUpdate, TodosApi,
};
pub use workflow::{LogicAppResult, WorkflowApi};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::{ApiClient, ApiResult, Envelope};

/// Result of a backend call plus the backend's own message, if it sent one
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub data: T,
    pub message: Option<String>,
}

impl<T> Outcome<T> {
    pub(crate) fn from_envelope(envelope: Envelope<T>) -> ApiResult<Self> {
        let (data, message) = envelope.into_parts()?;
        Ok(Self { data, message })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            data: f(self.data),
            message: self.message,
        }
    }
}

/// Envelope payload kept as loose JSON
pub type Fields = Map<String, Value>;

/// Send a request and unwrap the envelope, keeping the backend message
pub(crate) async fn fetch<T, B>(
    client: &ApiClient,
    method: Method,
    path: &str,
    body: Option<&B>,
) -> ApiResult<Outcome<T>>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    let envelope: Envelope<T> = client.request(method, path, body).await?;
    Outcome::from_envelope(envelope)
}

impl ApiClient {
    pub fn todos(&self) -> TodosApi<'_> {
        TodosApi::new(self)
    }

    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi::new(self)
    }

    pub fn connectivity(&self) -> ConnectivityApi<'_> {
        ConnectivityApi::new(self)
    }

    pub fn workflow(&self) -> WorkflowApi<'_> {
        WorkflowApi::new(self)
    }

    pub fn system(&self) -> SystemApi<'_> {
        SystemApi::new(self)
    }
}
