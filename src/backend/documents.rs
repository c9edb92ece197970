//! Document service
//!
//! Uploads go one file per request, in order, and each file gets its own
//! result so a partial batch can be reported.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{fetch, Fields, Outcome};
use crate::api::{ApiClient, ApiClientError, ApiResult, Endpoint, Envelope, UploadRejection};

/// Largest file accepted for upload (10 MB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const SUPPORTED_TYPES: [(&str, &str); 8] = [
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
];

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: u64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub blob_url: Option<String>,
    #[serde(default)]
    pub file_share_path: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
}

/// Document listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Aggregate document statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_mime_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_size: u64,
}

#[derive(Debug, Deserialize)]
struct StatsPayload {
    #[serde(default)]
    statistics: DocumentStats,
}

/// What the backend returns for one uploaded file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    #[serde(default)]
    pub document: Option<Value>,
    #[serde(default)]
    pub logic_app_result: Option<Value>,
}

/// Time-limited access URL for a blob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SasUrl {
    #[serde(default)]
    pub blob_name: String,
    pub sas_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkProcessRequest<'a> {
    document_ids: &'a [u64],
}

/// Check a local file against the accepted types and size limit,
/// returning the MIME type to send
pub fn validate_upload(path: &Path, size: u64) -> ApiResult<&'static str> {
    let name = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mime = SUPPORTED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| ApiClientError::InvalidUpload {
            file: name.clone(),
            reason: UploadRejection::UnsupportedType,
        })?;

    if size > MAX_UPLOAD_BYTES {
        return Err(ApiClientError::InvalidUpload {
            file: name,
            reason: UploadRejection::TooLarge,
        });
    }

    Ok(mime)
}

/// Document endpoints
pub struct DocumentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DocumentsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Outcome<DocumentList>> {
        let path = Endpoint::Documents.path()?;
        fetch::<_, ()>(self.client, Method::GET, &path, None).await
    }

    pub async fn stats(&self) -> ApiResult<Outcome<DocumentStats>> {
        let path = Endpoint::DocumentsStats.path()?;
        let outcome: Outcome<StatsPayload> =
            fetch::<_, ()>(self.client, Method::GET, &path, None).await?;
        Ok(outcome.map(|p| p.statistics))
    }

    /// Raw file content
    pub async fn download(&self, id: u64) -> ApiResult<Vec<u8>> {
        let path = Endpoint::DocumentsDownload.with_id(id)?;
        self.client.get_bytes(&path).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<Outcome<()>> {
        let path = Endpoint::Document.with_id(id)?;
        let outcome: Outcome<Fields> =
            fetch::<_, ()>(self.client, Method::DELETE, &path, None).await?;
        tracing::info!("Deleted document {}", id);
        Ok(outcome.map(|_| ()))
    }

    /// Trigger processing of one document
    pub async fn process(&self, id: u64) -> ApiResult<Outcome<Fields>> {
        let path = Endpoint::DocumentsProcess.with_id(id)?;
        fetch::<_, ()>(self.client, Method::POST, &path, None).await
    }

    pub async fn bulk_process(&self, ids: &[u64]) -> ApiResult<Outcome<Fields>> {
        let path = Endpoint::DocumentsBulkProcess.path()?;
        let body = BulkProcessRequest { document_ids: ids };
        fetch(self.client, Method::POST, &path, Some(&body)).await
    }

    /// Generate a SAS URL for a blob
    pub async fn sas_url(&self, blob_name: &str) -> ApiResult<Outcome<SasUrl>> {
        let path = Endpoint::DocumentsSas.with_id(blob_name)?;
        fetch::<_, ()>(self.client, Method::GET, &path, None).await
    }

    /// Upload one local file
    pub async fn upload(&self, path: &Path) -> ApiResult<Outcome<UploadReceipt>> {
        let size = tokio::fs::metadata(path).await?.len();
        let mime = validate_upload(path, size)?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let endpoint = Endpoint::DocumentsUpload.path()?;
        let envelope: Envelope<UploadReceipt> = self
            .client
            .upload(&endpoint, &file_name, mime, bytes)
            .await?;
        let outcome = Outcome::from_envelope(envelope)?;
        tracing::info!("Uploaded {} ({} bytes)", file_name, size);
        Ok(outcome)
    }

    /// Upload files one after another, collecting every result
    pub async fn upload_all(
        &self,
        paths: &[PathBuf],
    ) -> Vec<(PathBuf, ApiResult<Outcome<UploadReceipt>>)> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let result = self.upload(path).await;
            if let Err(e) = &result {
                tracing::warn!("Upload of {:?} failed: {}", path, e);
            }
            results.push((path.clone(), result));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::i18n::{Catalogs, Locale};
    use crate::test_support::spawn_backend;
    use axum::body::Bytes;
    use axum::extract::Path as UrlPath;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use tempfile::tempdir;

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/documents",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "total": 1,
                        "documents": [{
                            "id": 4,
                            "filename": "a1b2.pdf",
                            "originalName": "report.pdf",
                            "mimeType": "application/pdf",
                            "fileSize": 2048,
                            "status": "completed",
                            "uploadedAt": "2024-05-01T10:00:00Z"
                        }]
                    }))
                }),
            )
            .route(
                "/api/documents/stats",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "statistics": {
                            "total": 5,
                            "byStatus": {"completed": 3, "pending": 2},
                            "byMimeType": {"application/pdf": 5},
                            "totalSize": 10240
                        }
                    }))
                }),
            )
            .route(
                "/api/documents/:id",
                delete(|UrlPath(id): UrlPath<u64>| async move {
                    Json(json!({"success": true, "message": format!("Deleted {}", id)}))
                }),
            )
            .route(
                "/api/documents/:id/download",
                get(|| async { Bytes::from_static(b"%PDF-1.4 test") }),
            )
            .route(
                "/api/documents/sas/:name",
                get(|UrlPath(name): UrlPath<String>| async move {
                    Json(json!({
                        "success": true,
                        "blobName": name,
                        "sasUrl": format!("https://blob.example/{}?sig=abc", name)
                    }))
                }),
            )
            .route(
                "/api/documents/upload",
                post(|body: Bytes| async move {
                    let text = String::from_utf8_lossy(&body).to_string();
                    assert!(text.contains("name=\"file\""));
                    Json(json!({"success": true, "document": {"id": 12}}))
                }),
            )
    }

    async fn client() -> ApiClient {
        ApiClient::new(ApiConfig::new(spawn_backend(backend()).await)).unwrap()
    }

    #[test]
    fn test_validate_upload() {
        assert_eq!(
            validate_upload(Path::new("report.PDF"), 1024).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            validate_upload(Path::new("photo.jpeg"), 1024).unwrap(),
            "image/jpeg"
        );
        assert!(matches!(
            validate_upload(Path::new("archive.zip"), 1024),
            Err(ApiClientError::InvalidUpload { reason: UploadRejection::UnsupportedType, .. })
        ));
        assert!(matches!(
            validate_upload(Path::new("big.pdf"), MAX_UPLOAD_BYTES + 1),
            Err(ApiClientError::InvalidUpload { reason: UploadRejection::TooLarge, .. })
        ));
        assert!(validate_upload(Path::new("noext"), 1).is_err());
    }

    #[test]
    fn test_upload_rejections_are_localized() {
        let catalogs = Catalogs::embedded().unwrap();
        for reason in [UploadRejection::UnsupportedType, UploadRejection::TooLarge] {
            for &locale in Locale::supported() {
                let text = catalogs.translate(locale, reason.label_key());
                assert_ne!(text, reason.label_key());
            }
        }
        assert_eq!(
            catalogs.translate(Locale::En, UploadRejection::TooLarge.label_key()),
            "Maximum file size: 10MB"
        );
    }

    #[tokio::test]
    async fn test_list_and_stats() {
        let client = client().await;

        let list = client.documents().list().await.unwrap().data;
        assert_eq!(list.total, Some(1));
        assert_eq!(list.documents[0].original_name, "report.pdf");
        assert_eq!(list.documents[0].file_size, 2048);

        let stats = client.documents().stats().await.unwrap().data;
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_status.get("pending"), Some(&2));
        assert_eq!(stats.total_size, 10240);
    }

    #[tokio::test]
    async fn test_download_delete_sas() {
        let client = client().await;

        let bytes = client.documents().download(4).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 test");

        let deleted = client.documents().delete(4).await.unwrap();
        assert_eq!(deleted.message.as_deref(), Some("Deleted 4"));

        let sas = client.documents().sas_url("report.pdf").await.unwrap().data;
        assert_eq!(sas.blob_name, "report.pdf");
        assert!(sas.sas_url.starts_with("https://blob.example/report.pdf"));
    }

    #[tokio::test]
    async fn test_upload_all_reports_each_file() {
        let client = client().await;
        let dir = tempdir().unwrap();

        let good = dir.path().join("notes.txt");
        std::fs::write(&good, "hello").unwrap();
        let bad = dir.path().join("archive.zip");
        std::fs::write(&bad, "zip").unwrap();
        let missing = dir.path().join("missing.pdf");

        let results = client
            .documents()
            .upload_all(&[good.clone(), bad, missing])
            .await;
        assert_eq!(results.len(), 3);

        let receipt = results[0].1.as_ref().unwrap();
        assert_eq!(receipt.data.document.as_ref().unwrap()["id"], 12);
        assert!(matches!(
            results[1].1,
            Err(ApiClientError::InvalidUpload { .. })
        ));
        assert!(matches!(results[2].1, Err(ApiClientError::Io(_))));
    }
}
