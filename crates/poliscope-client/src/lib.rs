pub mod http;
pub mod wire;

pub use http::{ApiError, BackendClient, SOURCE_COLLECTION, TARGET_COLLECTION};
pub use wire::{
    ClauseRecord, CompareAnalysis, DatasetInfo, DocumentList, DocumentRecord, IngestReceipt,
    ParsedDocument, SegmentList, SegmentRecord,
};
