//! Wire types for the policy backend API.
//!
//! Response shapes follow the backend verbatim; every non-essential field is
//! `#[serde(default)]` so a missing or null field degrades to an empty value
//! instead of failing the whole response.

use poliscope_core::{ClauseComparison, CompareRequest, DocumentOption, TargetClause};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ── Document listing ──

/// Collection metadata attached to a document list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsingPayload {
    #[serde(default)]
    pub chunk_count: u64,
}

/// One stored document as returned by the document-list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(default)]
    pub source_filename: String,
    #[serde(default)]
    pub status: String,
    /// ISO 8601 timestamp string.
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub parsing_payload: ParsingPayload,
}

impl DocumentRecord {
    /// Project this record into a selectable option.
    pub fn to_option(&self) -> DocumentOption {
        DocumentOption::from_filename(self.id.clone(), &self.source_filename)
    }
}

/// Response of `GET /api/rag/documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub dataset: DatasetInfo,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub total: u64,
}

impl DocumentList {
    /// Selectable options for every listed document, in backend order.
    pub fn options(&self) -> Vec<DocumentOption> {
        self.documents.iter().map(DocumentRecord::to_option).collect()
    }
}

// ── Document segments ──

/// One ordered segment of a parsed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentRecord {
    pub id: String,
    #[serde(default)]
    pub position: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub tokens: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub hit_count: u64,
}

/// Response of `GET /api/rag/documents/{id}/chunks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub data: Vec<SegmentRecord>,
    #[serde(default)]
    pub count: u64,
}

// ── Comparison analysis ──

/// Body of `POST /api/compare/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct CompareBody {
    pub local_doc_id: String,
    pub national_doc_ids: Vec<String>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

impl CompareBody {
    /// Build the wire body from a domain request.
    ///
    /// `collection_name` overrides the backend's default target collection
    /// when set.
    pub fn from_request(req: &CompareRequest, collection_name: Option<String>) -> Self {
        Self {
            local_doc_id: req.source_doc_id.clone(),
            national_doc_ids: req.target_doc_ids.clone(),
            limit: req.result_limit,
            collection_name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NationClause {
    #[serde(default)]
    pub nation_name: String,
    #[serde(default)]
    pub clause: String,
}

/// One clause record as returned by the analysis endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClauseRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub local_clause: String,
    #[serde(default)]
    pub local_clause_title: String,
    #[serde(default)]
    pub diff_type: String,
    #[serde(default)]
    pub diff_keywords: String,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub national_clauses: Vec<NationClause>,
}

impl ClauseRecord {
    /// Map the wire record into the domain comparison type.
    ///
    /// A matched clause without a document name is labelled "国家条款 {n}"
    /// (1-based position).
    pub fn into_comparison(self) -> ClauseComparison {
        let matched = self
            .national_clauses
            .into_iter()
            .enumerate()
            .map(|(idx, nc)| TargetClause {
                label: if nc.nation_name.is_empty() {
                    format!("国家条款 {}", idx + 1)
                } else {
                    nc.nation_name
                },
                excerpt: nc.clause,
            })
            .collect();

        ClauseComparison {
            id: self.id,
            source_excerpt: self.local_clause,
            diff_classification: self.diff_type,
            diff_keywords: self.diff_keywords,
            analysis: self.analysis,
            matched,
        }
    }
}

/// Response of `POST /api/compare/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareAnalysis {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub local_file: String,
    #[serde(default)]
    pub clauses: Vec<ClauseRecord>,
}

impl CompareAnalysis {
    /// Domain comparison records in backend order.
    pub fn into_comparisons(self) -> Vec<ClauseComparison> {
        self.clauses
            .into_iter()
            .map(ClauseRecord::into_comparison)
            .collect()
    }
}

// ── Ingest & parsed artifacts ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingStats {
    #[serde(default)]
    pub attempted: u64,
    #[serde(default)]
    pub uploaded: u64,
    #[serde(default)]
    pub failed: u64,
}

/// Response of `POST /api/rag/ingest-and-index`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestReceipt {
    #[serde(default)]
    pub success: bool,
    pub doc_id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub chunk_count: u64,
    #[serde(default)]
    pub embedding_stats: EmbeddingStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionCounts {
    #[serde(default)]
    pub chapters: u64,
    #[serde(default)]
    pub sections: u64,
    #[serde(default)]
    pub articles: u64,
}

/// Response of `GET /api/rag/documents/{id}/parsed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedDocument {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub file: FileInfo,
    #[serde(default)]
    pub content: String,
    /// Table-of-contents tree, rendered opaque here.
    #[serde(default)]
    pub toc: serde_json::Value,
    #[serde(default)]
    pub counts: SectionCounts,
    #[serde(default)]
    pub keywords: serde_json::Value,
}
