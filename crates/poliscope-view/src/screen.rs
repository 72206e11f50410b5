//! Async driver tying [`ScreenState`] to a backend.
//!
//! The state machine stays synchronous and pure; this layer performs the two
//! suspension points — the joined list loads and the single comparison call
//! — and feeds outcomes back through the `apply_*` reducers. Callers are
//! never blocked on an error: failures land in `state.last_error` and the
//! screen stays interactive.

use async_trait::async_trait;
use poliscope_client::{ApiError, BackendClient, SOURCE_COLLECTION, TARGET_COLLECTION};
use poliscope_core::{ClauseComparison, CompareRequest, DocumentOption};

use crate::state::ScreenState;

/// The backend operations the comparison screen needs.
#[async_trait]
pub trait CompareBackend {
    /// Source-side (local policy) document options.
    async fn source_documents(&self) -> Result<Vec<DocumentOption>, ApiError>;

    /// Target-side (national policy) document options.
    async fn target_documents(&self) -> Result<Vec<DocumentOption>, ApiError>;

    /// Clause-level comparison of the request's source against its targets.
    async fn analyze(&self, req: &CompareRequest) -> Result<Vec<ClauseComparison>, ApiError>;
}

#[async_trait]
impl CompareBackend for BackendClient {
    async fn source_documents(&self) -> Result<Vec<DocumentOption>, ApiError> {
        Ok(self.list_documents(SOURCE_COLLECTION).await?.options())
    }

    async fn target_documents(&self) -> Result<Vec<DocumentOption>, ApiError> {
        Ok(self.list_documents(TARGET_COLLECTION).await?.options())
    }

    async fn analyze(&self, req: &CompareRequest) -> Result<Vec<ClauseComparison>, ApiError> {
        Ok(self.analyze_comparison(req, None).await?.into_comparisons())
    }
}

/// One comparison screen instance: state plus the backend that feeds it.
pub struct CompareScreen<B> {
    pub state: ScreenState,
    backend: B,
}

impl<B: CompareBackend> CompareScreen<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: ScreenState::new(),
            backend,
        }
    }

    pub fn with_state(backend: B, state: ScreenState) -> Self {
        Self { state, backend }
    }

    /// Load both document lists concurrently.
    ///
    /// The two fetches are independent; a failed side degrades to its
    /// previous options rather than clearing them.
    pub async fn load_lists(&mut self) {
        let seq = self.state.begin_list_load();
        let (source, target) = tokio::join!(
            self.backend.source_documents(),
            self.backend.target_documents(),
        );
        self.state.apply_list_load(
            seq,
            source.map_err(|e| e.to_string()),
            target.map_err(|e| e.to_string()),
        );
    }

    /// Trigger one comparison from the current selection.
    ///
    /// A no-op when the selection is incomplete or a comparison is already
    /// in flight. No retry: a failure waits for the user to re-trigger.
    pub async fn generate(&mut self) {
        let Some((request, seq)) = self.state.begin_compare() else {
            return;
        };
        let result = self.backend.analyze(&request).await;
        self.state
            .apply_compare(seq, result.map_err(|e| e.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted backend: per-call outcomes plus a log of analyze requests.
    struct StubBackend {
        source_ok: bool,
        target_ok: bool,
        analyze_ok: bool,
        clauses: Vec<ClauseComparison>,
        requests: Mutex<Vec<CompareRequest>>,
    }

    impl StubBackend {
        fn new(clauses: Vec<ClauseComparison>) -> Self {
            Self {
                source_ok: true,
                target_ok: true,
                analyze_ok: true,
                clauses,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn server_error() -> ApiError {
            ApiError::Server {
                status: 500,
                body: "internal error".to_string(),
            }
        }
    }

    #[async_trait]
    impl CompareBackend for StubBackend {
        async fn source_documents(&self) -> Result<Vec<DocumentOption>, ApiError> {
            if self.source_ok {
                Ok(vec![DocumentOption {
                    id: "doc-A".into(),
                    label: "地方条例".into(),
                }])
            } else {
                Err(Self::server_error())
            }
        }

        async fn target_documents(&self) -> Result<Vec<DocumentOption>, ApiError> {
            if self.target_ok {
                Ok(vec![DocumentOption {
                    id: "doc-B".into(),
                    label: "国家政策".into(),
                }])
            } else {
                Err(Self::server_error())
            }
        }

        async fn analyze(&self, req: &CompareRequest) -> Result<Vec<ClauseComparison>, ApiError> {
            self.requests.lock().unwrap().push(req.clone());
            if self.analyze_ok {
                Ok(self.clauses.clone())
            } else {
                Err(Self::server_error())
            }
        }
    }

    fn clause(id: &str, classification: &str) -> ClauseComparison {
        ClauseComparison {
            id: id.to_string(),
            source_excerpt: String::new(),
            diff_classification: classification.to_string(),
            diff_keywords: String::new(),
            analysis: String::new(),
            matched: vec![],
        }
    }

    fn select_all(screen: &mut CompareScreen<StubBackend>) {
        let source = screen.state.source_options.first().cloned();
        let targets = screen.state.target_options.clone();
        screen.state.set_source(source);
        screen.state.set_targets(targets);
    }

    #[tokio::test]
    async fn load_lists_populates_both_sides() {
        let mut screen = CompareScreen::new(StubBackend::new(vec![]));
        screen.load_lists().await;

        assert!(!screen.state.loading_lists);
        assert_eq!(screen.state.source_options[0].id, "doc-A");
        assert_eq!(screen.state.target_options[0].id, "doc-B");
    }

    #[tokio::test]
    async fn load_lists_degrades_per_side() {
        let mut backend = StubBackend::new(vec![]);
        backend.source_ok = false;
        let mut screen = CompareScreen::new(backend);
        screen.load_lists().await;

        assert!(screen.state.source_options.is_empty());
        assert_eq!(screen.state.target_options.len(), 1);
        assert!(screen.state.last_error.is_some());
    }

    #[tokio::test]
    async fn generate_runs_one_comparison() {
        let mut screen = CompareScreen::new(StubBackend::new(vec![
            clause("L-001", "冲突"),
            clause("L-002", "无差异"),
        ]));
        screen.load_lists().await;
        select_all(&mut screen);

        screen.generate().await;

        assert_eq!(screen.state.compare_results.len(), 2);
        assert_eq!(screen.state.selected_clause_id.as_deref(), Some("L-001"));
        assert!(!screen.state.generating);

        let requests = screen.backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source_doc_id, "doc-A");
        assert_eq!(requests[0].target_doc_ids, vec!["doc-B"]);
    }

    #[tokio::test]
    async fn generate_without_selection_issues_no_request() {
        let mut screen = CompareScreen::new(StubBackend::new(vec![clause("L-001", "冲突")]));
        screen.load_lists().await;

        screen.generate().await;

        assert!(screen.backend.requests.lock().unwrap().is_empty());
        assert!(screen.state.compare_results.is_empty());
    }

    #[tokio::test]
    async fn failed_generate_keeps_screen_retryable() {
        let mut backend = StubBackend::new(vec![clause("L-001", "冲突")]);
        backend.analyze_ok = false;
        let mut screen = CompareScreen::new(backend);
        screen.load_lists().await;
        select_all(&mut screen);

        screen.generate().await;
        assert!(screen.state.compare_results.is_empty());
        assert!(screen.state.last_error.is_some());
        assert!(!screen.state.generating, "trigger is re-enabled");

        // Manual re-trigger succeeds once the backend recovers.
        screen.backend.analyze_ok = true;
        screen.generate().await;
        assert_eq!(screen.state.compare_results.len(), 1);
        assert!(screen.state.last_error.is_none());
    }
}
