pub mod clause;
pub mod document;
pub mod verdict;

pub use clause::{ClauseComparison, CompareRequest, TargetClause, DEFAULT_RESULT_LIMIT};
pub use document::DocumentOption;
pub use verdict::{DiffMarkers, DiffVerdict};
