//! Selectable document options for the comparison screen.

use serde::{Deserialize, Serialize};

/// One selectable document in a source or target list.
///
/// Options are unique per list and immutable once loaded; a reload replaces
/// the whole list rather than merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOption {
    pub id: String,
    pub label: String,
}

impl DocumentOption {
    /// Build an option from a document id and its stored filename.
    ///
    /// The label is the filename with its final extension removed, so
    /// "深圳市数字经济条例.pdf" lists as "深圳市数字经济条例". A filename
    /// without an extension is used as-is; an empty filename falls back to
    /// the id.
    pub fn from_filename(id: impl Into<String>, filename: &str) -> Self {
        let id = id.into();
        let label = strip_extension(filename);
        let label = if label.is_empty() { id.clone() } else { label };
        Self { id, label }
    }
}

/// Remove the final `.ext` component of a filename, if any.
///
/// A leading dot (hidden-file style) is not treated as an extension.
fn strip_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() && !name[idx + 1..].contains('/') => {
            name[..idx].to_string()
        }
        _ => name.to_string(),
    }
}
