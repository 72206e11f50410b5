//! HTTP client for the policy backend's REST API.

use std::path::Path;

use poliscope_core::CompareRequest;
use thiserror::Error;
use tracing::info;

use crate::wire::{
    CompareAnalysis, CompareBody, DocumentList, IngestReceipt, ParsedDocument, SegmentList,
};

/// Backend collection holding source-side (local) policy documents.
pub const SOURCE_COLLECTION: &str = "policy_documents";

/// Backend collection holding target-side (national) policy documents.
pub const TARGET_COLLECTION: &str = "national_policy_documents";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading upload file: {0}")]
    Io(#[from] std::io::Error),
}

/// Client for the backend's document, comparison, and ingest endpoints.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:10010` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List the documents of a backend collection.
    pub async fn list_documents(&self, collection: &str) -> Result<DocumentList, ApiError> {
        let url = format!("{}/api/rag/documents", self.base_url);

        info!(url = %url, collection = %collection, "listing documents");
        let resp = self
            .client
            .get(&url)
            .query(&[("collection_name", collection)])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let list: DocumentList = resp.json().await?;
        info!(count = list.documents.len(), "listed documents");
        Ok(list)
    }

    /// Fetch the ordered segments of a document.
    pub async fn document_segments(&self, doc_id: &str) -> Result<SegmentList, ApiError> {
        let url = format!("{}/api/rag/documents/{}/chunks", self.base_url, doc_id);

        info!(url = %url, "fetching document segments");
        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;

        let list: SegmentList = resp.json().await?;
        info!(count = list.data.len(), "fetched segments");
        Ok(list)
    }

    /// Run a clause-level comparison of one source document against the
    /// selected target documents.
    ///
    /// `collection` overrides the backend's default target collection when
    /// set.
    pub async fn analyze_comparison(
        &self,
        req: &CompareRequest,
        collection: Option<String>,
    ) -> Result<CompareAnalysis, ApiError> {
        let url = format!("{}/api/compare/analyze", self.base_url);
        let body = CompareBody::from_request(req, collection);

        info!(
            url = %url,
            source = %body.local_doc_id,
            targets = body.national_doc_ids.len(),
            limit = body.limit,
            "requesting comparison analysis"
        );
        let resp = self.client.post(&url).json(&body).send().await?;
        let resp = ensure_success(resp).await?;

        let analysis: CompareAnalysis = resp.json().await?;
        info!(clauses = analysis.clauses.len(), "comparison analysis complete");
        Ok(analysis)
    }

    /// Upload a document for parsing, segmentation, and indexing.
    ///
    /// The backend does all the work in one call; the receipt carries the new
    /// document id and chunk/embedding statistics.
    pub async fn ingest_document(
        &self,
        path: &Path,
        collection: Option<&str>,
    ) -> Result<IngestReceipt, ApiError> {
        let url = format!("{}/api/rag/ingest-and-index", self.base_url);

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let bytes = tokio::fs::read(path).await?;

        let mut form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes).file_name(filename.clone()),
        );
        if let Some(name) = collection {
            form = form.text("collection_name", name.to_string());
        }

        info!(url = %url, file = %filename, "uploading document");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = ensure_success(resp).await?;

        let receipt: IngestReceipt = resp.json().await?;
        info!(
            doc_id = %receipt.doc_id,
            chunks = receipt.chunk_count,
            "document ingested"
        );
        Ok(receipt)
    }

    /// Fetch the parsed artifacts (content, toc, counts) of a document.
    pub async fn parsed_document(&self, doc_id: &str) -> Result<ParsedDocument, ApiError> {
        let url = format!("{}/api/rag/documents/{}/parsed", self.base_url, doc_id);

        info!(url = %url, "fetching parsed document");
        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;

        Ok(resp.json().await?)
    }
}

/// Map a non-2xx response to [`ApiError::Server`] carrying the body text.
async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        body,
    })
}
