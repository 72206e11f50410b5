//! Clause-level comparison records and the request that produces them.

use serde::{Deserialize, Serialize};

use crate::verdict::DiffMarkers;

/// Matched target clauses returned per source clause by default.
pub const DEFAULT_RESULT_LIMIT: u32 = 2;

/// Characters of the source excerpt used when titling a clause.
const TITLE_EXCERPT_CHARS: usize = 18;

/// A comparison request, built from the current selection at trigger time.
///
/// `source_doc_id` must be set and `target_doc_ids` non-empty; the
/// orchestrator refuses to issue the request otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub source_doc_id: String,
    pub target_doc_ids: Vec<String>,
    pub result_limit: u32,
}

/// One target-side clause matched against a source clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetClause {
    /// Display label, normally the target document's name.
    pub label: String,
    pub excerpt: String,
}

/// One clause-level comparison record.
///
/// Produced once per comparison request and replaced wholesale by the next;
/// there is no incremental merge. Whether the clause "has a difference" is
/// derived from `diff_classification` via [`DiffMarkers`], never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseComparison {
    pub id: String,
    pub source_excerpt: String,
    pub diff_classification: String,
    pub diff_keywords: String,
    pub analysis: String,
    /// Matched target clauses in backend order.
    pub matched: Vec<TargetClause>,
}

impl ClauseComparison {
    /// Whether this clause diverges from its matched targets.
    pub fn has_difference(&self, markers: &DiffMarkers) -> bool {
        markers.verdict(&self.diff_classification).is_difference()
    }

    /// List title: "地方条款 {id}：{excerpt prefix}".
    ///
    /// The prefix is the first 18 characters of the source excerpt, taken on
    /// char boundaries; an empty excerpt falls back to the clause id.
    pub fn title(&self) -> String {
        let prefix: String = self.source_excerpt.chars().take(TITLE_EXCERPT_CHARS).collect();
        let prefix = if prefix.is_empty() {
            self.id.clone()
        } else {
            prefix
        };
        format!("地方条款 {}：{}", self.id, prefix)
    }

    /// Short difference summary for list rows: keywords, falling back to the
    /// raw classification label.
    pub fn diff_summary(&self) -> &str {
        if self.diff_keywords.is_empty() {
            &self.diff_classification
        } else {
            &self.diff_keywords
        }
    }

    /// Analysis text for the detail panel.
    ///
    /// A no-difference clause with no analysis from the backend reads as
    /// "与国家条款一致" rather than blank.
    pub fn display_analysis(&self, markers: &DiffMarkers) -> &str {
        if self.analysis.is_empty() && !self.has_difference(markers) {
            "与国家条款一致"
        } else {
            &self.analysis
        }
    }
}
