//! Difference verdicts for clause classification labels.
//!
//! The analysis backend labels each clause relationship with a free-form
//! string ("无差异", "缺失", "超出范围", "冲突", "无法比较", ...). The
//! screen only cares about a binary verdict, derived by substring matching
//! against a closed marker table rather than per-field checks scattered
//! through the UI code.

/// Classification markers that count as a difference.
///
/// Labels containing any of these substrings — missing, exceeds scope,
/// conflict — flag the clause; everything else (including the explicit
/// "无差异" label and the empty string) does not.
pub const DIFF_MARKERS: &[&str] = &["缺失", "超出范围", "冲突"];

/// Binary verdict derived from a clause's classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffVerdict {
    /// The source clause diverges from its matched target clauses.
    Difference,
    /// Consistent with the targets, or not comparable.
    NoDifference,
}

impl DiffVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Difference => "存在差异",
            Self::NoDifference => "无差异",
        }
    }

    pub fn is_difference(&self) -> bool {
        matches!(self, Self::Difference)
    }
}

/// The marker table mapping raw backend labels to a [`DiffVerdict`].
#[derive(Debug, Clone)]
pub struct DiffMarkers {
    markers: Vec<String>,
}

impl Default for DiffMarkers {
    fn default() -> Self {
        Self {
            markers: DIFF_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl DiffMarkers {
    /// Build a table from custom marker substrings.
    pub fn new(markers: impl IntoIterator<Item = String>) -> Self {
        Self {
            markers: markers.into_iter().collect(),
        }
    }

    /// Classify a raw backend label.
    pub fn verdict(&self, classification: &str) -> DiffVerdict {
        let label = classification.trim();
        if !label.is_empty() && self.markers.iter().any(|m| label.contains(m.as_str())) {
            DiffVerdict::Difference
        } else {
            DiffVerdict::NoDifference
        }
    }
}
