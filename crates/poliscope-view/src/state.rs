//! Screen state for the comparison view.
//!
//! All state lives in one [`ScreenState`] struct mutated by reducer-style
//! methods, so every transition is unit-testable without a rendering
//! environment. Async work happens elsewhere ([`crate::screen`]): a caller
//! obtains a request plus sequence number from a `begin_*` method, performs
//! the I/O, and feeds the outcome back through the matching `apply_*` method.
//! A response whose sequence number no longer matches the latest issued
//! request is discarded, so a superseded list-load or comparison can never
//! overwrite newer state.

use poliscope_core::{
    ClauseComparison, CompareRequest, DiffMarkers, DocumentOption, DEFAULT_RESULT_LIMIT,
};
use tracing::{debug, warn};

/// Clause rows shown before the first "expand" interaction.
pub const VISIBLE_DEFAULT: usize = 4;

/// Rows added per expand interaction.
pub const VISIBLE_STEP: usize = 6;

/// Notification for the display layer; carries no data mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Scroll the clause detail panel back to its top.
    ScrollDetailTop,
}

/// The comparison screen's entire state: option lists, selection, results,
/// projection window, and in-flight request tracking.
#[derive(Debug)]
pub struct ScreenState {
    pub source_options: Vec<DocumentOption>,
    pub target_options: Vec<DocumentOption>,

    pub selected_source: Option<DocumentOption>,
    pub selected_targets: Vec<DocumentOption>,

    /// Show only clauses with a difference. On by default, matching the
    /// screen's original behaviour.
    pub diff_only: bool,
    pub visible_count: usize,
    pub compare_results: Vec<ClauseComparison>,
    pub selected_clause_id: Option<String>,

    pub loading_lists: bool,
    pub generating: bool,
    /// Most recent failure, for the message area. Cleared on the next trigger.
    pub last_error: Option<String>,

    /// Matched target clauses requested per source clause.
    pub result_limit: u32,

    markers: DiffMarkers,
    list_seq: u64,
    compare_seq: u64,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            source_options: Vec::new(),
            target_options: Vec::new(),
            selected_source: None,
            selected_targets: Vec::new(),
            diff_only: true,
            visible_count: VISIBLE_DEFAULT,
            compare_results: Vec::new(),
            selected_clause_id: None,
            loading_lists: false,
            generating: false,
            last_error: None,
            result_limit: DEFAULT_RESULT_LIMIT,
            markers: DiffMarkers::default(),
            list_seq: 0,
            compare_seq: 0,
        }
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default marker table.
    pub fn with_markers(mut self, markers: DiffMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn markers(&self) -> &DiffMarkers {
        &self.markers
    }

    // ── Selection ──

    /// Select the source document (or clear it).
    ///
    /// Any selection change drops the current results so stale clauses are
    /// never shown against a changed selection.
    pub fn set_source(&mut self, source: Option<DocumentOption>) {
        self.selected_source = source;
        self.reset_results();
    }

    /// Replace the target document selection.
    pub fn set_targets(&mut self, targets: Vec<DocumentOption>) {
        self.selected_targets = targets;
        self.reset_results();
    }

    /// Clear both sides of the selection.
    pub fn clear(&mut self) {
        self.selected_source = None;
        self.selected_targets.clear();
        self.reset_results();
    }

    /// Drop results and restore projection defaults.
    ///
    /// Bumps the compare sequence so an in-flight comparison issued against
    /// the previous selection is discarded on arrival.
    fn reset_results(&mut self) {
        self.compare_results.clear();
        self.selected_clause_id = None;
        self.visible_count = VISIBLE_DEFAULT;
        self.compare_seq += 1;
        self.generating = false;
    }

    // ── List loading ──

    /// Mark the option lists as loading and issue a new load sequence.
    pub fn begin_list_load(&mut self) -> u64 {
        self.loading_lists = true;
        self.list_seq += 1;
        self.list_seq
    }

    /// Apply the outcome of a list load.
    ///
    /// Each side is independent: a failed side keeps its previous options
    /// (degraded but usable) while a successful side is replaced wholesale.
    /// Outcomes from a superseded load are discarded.
    pub fn apply_list_load(
        &mut self,
        seq: u64,
        source: Result<Vec<DocumentOption>, String>,
        target: Result<Vec<DocumentOption>, String>,
    ) {
        if seq != self.list_seq {
            debug!(seq, latest = self.list_seq, "discarding stale list load");
            return;
        }
        self.loading_lists = false;

        match source {
            Ok(options) => self.source_options = options,
            Err(err) => {
                warn!(error = %err, "source document list load failed");
                self.last_error = Some(err);
            }
        }
        match target {
            Ok(options) => self.target_options = options,
            Err(err) => {
                warn!(error = %err, "target document list load failed");
                self.last_error = Some(err);
            }
        }
    }

    // ── Comparison orchestration ──

    /// Whether a comparison can currently be triggered.
    pub fn can_generate(&self) -> bool {
        self.selected_source.is_some() && !self.selected_targets.is_empty() && !self.generating
    }

    /// Start a comparison from the current selection.
    ///
    /// Returns the request to issue plus its sequence number, or `None` when
    /// the selection is incomplete or a comparison is already in flight — a
    /// silent refusal with no state change beyond the in-flight flag.
    pub fn begin_compare(&mut self) -> Option<(CompareRequest, u64)> {
        if !self.can_generate() {
            return None;
        }
        let source = self.selected_source.as_ref()?;

        self.generating = true;
        self.last_error = None;
        self.compare_seq += 1;

        let request = CompareRequest {
            source_doc_id: source.id.clone(),
            target_doc_ids: self.selected_targets.iter().map(|t| t.id.clone()).collect(),
            result_limit: self.result_limit,
        };
        Some((request, self.compare_seq))
    }

    /// Apply the outcome of a comparison request.
    ///
    /// Success replaces the results wholesale, selects the first clause, and
    /// resets the projection window. Failure records the message and leaves
    /// prior results untouched. Stale outcomes are discarded without
    /// touching the in-flight flag, which by then belongs to a newer request.
    pub fn apply_compare(&mut self, seq: u64, result: Result<Vec<ClauseComparison>, String>) {
        if seq != self.compare_seq {
            debug!(seq, latest = self.compare_seq, "discarding stale comparison");
            return;
        }
        self.generating = false;

        match result {
            Ok(clauses) => {
                self.selected_clause_id = clauses.first().map(|c| c.id.clone());
                self.compare_results = clauses;
                self.visible_count = VISIBLE_DEFAULT;
            }
            Err(err) => {
                warn!(error = %err, "comparison analysis failed");
                self.last_error = Some(err);
            }
        }
    }

    // ── Projection ──

    /// Clauses currently visible: diff-filtered, then windowed to
    /// `visible_count`, in backend order.
    pub fn visible_clauses(&self) -> Vec<&ClauseComparison> {
        self.compare_results
            .iter()
            .filter(|c| !self.diff_only || c.has_difference(&self.markers))
            .take(self.visible_count)
            .collect()
    }

    /// Whether results remain beyond the current window.
    pub fn has_more(&self) -> bool {
        self.compare_results.len() > self.visible_clauses().len()
    }

    /// Widen the window by [`VISIBLE_STEP`] when more results remain.
    /// The window never shrinks automatically.
    pub fn expand_visible(&mut self) {
        if self.has_more() {
            self.visible_count += VISIBLE_STEP;
        }
    }

    pub fn set_diff_only(&mut self, diff_only: bool) {
        self.diff_only = diff_only;
    }

    /// Select a clause for the detail panel.
    pub fn select_clause(&mut self, id: &str) -> Effect {
        self.selected_clause_id = Some(id.to_string());
        Effect::ScrollDetailTop
    }

    /// The selected clause's full record, or `None` after a reset.
    pub fn selected_clause(&self) -> Option<&ClauseComparison> {
        let id = self.selected_clause_id.as_deref()?;
        self.compare_results.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(id: &str) -> DocumentOption {
        DocumentOption {
            id: id.to_string(),
            label: format!("{id}-label"),
        }
    }

    fn clause(id: &str, classification: &str) -> ClauseComparison {
        ClauseComparison {
            id: id.to_string(),
            source_excerpt: format!("条款 {id}"),
            diff_classification: classification.to_string(),
            diff_keywords: String::new(),
            analysis: String::new(),
            matched: vec![],
        }
    }

    /// State with a valid selection, ready to compare.
    fn selected_state() -> ScreenState {
        let mut state = ScreenState::new();
        state.set_source(Some(opt("doc-A")));
        state.set_targets(vec![opt("doc-B"), opt("doc-C")]);
        state
    }

    /// Drive a full successful comparison through begin/apply.
    fn with_results(clauses: Vec<ClauseComparison>) -> ScreenState {
        let mut state = selected_state();
        let (_, seq) = state.begin_compare().unwrap();
        state.apply_compare(seq, Ok(clauses));
        state
    }

    #[test]
    fn defaults() {
        let state = ScreenState::new();
        assert!(state.diff_only);
        assert_eq!(state.visible_count, VISIBLE_DEFAULT);
        assert_eq!(state.result_limit, DEFAULT_RESULT_LIMIT);
        assert!(state.compare_results.is_empty());
        assert!(state.selected_clause_id.is_none());
    }

    #[test]
    fn selection_change_resets_results() {
        let mut state = with_results(vec![clause("L-001", "冲突")]);
        state.visible_count = 10;
        assert!(state.selected_clause_id.is_some());

        state.set_source(Some(opt("doc-Z")));
        assert!(state.compare_results.is_empty());
        assert!(state.selected_clause_id.is_none());
        assert_eq!(state.visible_count, VISIBLE_DEFAULT);

        let mut state = with_results(vec![clause("L-001", "冲突")]);
        state.set_targets(vec![opt("doc-D")]);
        assert!(state.compare_results.is_empty());
        assert!(state.selected_clause_id.is_none());
        assert_eq!(state.visible_count, VISIBLE_DEFAULT);
    }

    #[test]
    fn clear_drops_selection_and_results() {
        let mut state = with_results(vec![clause("L-001", "冲突")]);
        state.clear();
        assert!(state.selected_source.is_none());
        assert!(state.selected_targets.is_empty());
        assert!(state.compare_results.is_empty());
    }

    #[test]
    fn generate_refused_without_full_selection() {
        let mut state = ScreenState::new();
        assert!(state.begin_compare().is_none());

        state.set_source(Some(opt("doc-A")));
        assert!(state.begin_compare().is_none(), "no targets yet");

        state.set_source(None);
        state.set_targets(vec![opt("doc-B")]);
        assert!(state.begin_compare().is_none(), "no source");
        assert!(!state.generating);
    }

    #[test]
    fn generate_refused_while_in_flight() {
        let mut state = selected_state();
        let first = state.begin_compare();
        assert!(first.is_some());
        assert!(state.generating);
        assert!(state.begin_compare().is_none(), "one in-flight slot only");
    }

    #[test]
    fn begin_compare_builds_request_from_selection() {
        let mut state = selected_state();
        let (req, _) = state.begin_compare().unwrap();
        assert_eq!(req.source_doc_id, "doc-A");
        assert_eq!(req.target_doc_ids, vec!["doc-B", "doc-C"]);
        assert_eq!(req.result_limit, DEFAULT_RESULT_LIMIT);
    }

    #[test]
    fn success_selects_first_clause() {
        let state = with_results(vec![clause("L-001", "冲突"), clause("L-002", "无差异")]);
        assert_eq!(state.selected_clause_id.as_deref(), Some("L-001"));
        assert!(!state.generating);
        assert_eq!(state.visible_count, VISIBLE_DEFAULT);
    }

    #[test]
    fn empty_result_selects_nothing() {
        let state = with_results(vec![]);
        assert!(state.selected_clause_id.is_none());
        assert!(state.compare_results.is_empty());
        assert!(!state.generating);
    }

    #[test]
    fn failure_leaves_previous_results() {
        let mut state = with_results(vec![clause("L-001", "冲突")]);
        state.select_clause("L-001");

        let (_, seq) = state.begin_compare().unwrap();
        state.apply_compare(seq, Err("server returned 500: boom".to_string()));

        assert_eq!(state.compare_results.len(), 1);
        assert_eq!(state.selected_clause_id.as_deref(), Some("L-001"));
        assert!(!state.generating);
        assert_eq!(
            state.last_error.as_deref(),
            Some("server returned 500: boom")
        );
    }

    #[test]
    fn stale_comparison_is_discarded() {
        let mut state = selected_state();
        let (_, old_seq) = state.begin_compare().unwrap();

        // Selection changes while the request is in flight.
        state.set_targets(vec![opt("doc-D")]);
        state.apply_compare(old_seq, Ok(vec![clause("L-001", "冲突")]));

        assert!(
            state.compare_results.is_empty(),
            "superseded response must not overwrite state"
        );
        assert!(state.selected_clause_id.is_none());
    }

    #[test]
    fn stale_response_keeps_newer_in_flight_flag() {
        let mut state = selected_state();
        let (_, old_seq) = state.begin_compare().unwrap();
        state.set_targets(vec![opt("doc-D")]);
        let (_, new_seq) = state.begin_compare().unwrap();

        state.apply_compare(old_seq, Err("timed out".to_string()));
        assert!(state.generating, "newer request is still in flight");

        state.apply_compare(new_seq, Ok(vec![clause("L-010", "缺失")]));
        assert!(!state.generating);
        assert_eq!(state.selected_clause_id.as_deref(), Some("L-010"));
    }

    #[test]
    fn diff_only_excludes_consistent_clauses() {
        let state = with_results(vec![
            clause("L-001", "冲突"),
            clause("L-002", "无差异"),
            clause("L-003", "缺失"),
        ]);
        let visible = state.visible_clauses();
        assert!(visible.iter().all(|c| c.has_difference(state.markers())));
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn projection_scenario_five_clauses() {
        // Clauses 1, 2, 4 classify as differences; 3 and 5 as 无差异.
        let mut state = with_results(vec![
            clause("L-001", "冲突"),
            clause("L-002", "缺失"),
            clause("L-003", "无差异"),
            clause("L-004", "冲突"),
            clause("L-005", "无差异"),
        ]);

        state.set_diff_only(true);
        let ids: Vec<&str> = state.visible_clauses().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["L-001", "L-002", "L-004"]);

        state.set_diff_only(false);
        let ids: Vec<&str> = state.visible_clauses().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["L-001", "L-002", "L-003", "L-004"], "window of 4");
    }

    #[test]
    fn expand_is_monotonic_and_never_shrinks_projection() {
        let clauses: Vec<ClauseComparison> = (0..20)
            .map(|i| clause(&format!("L-{i:03}"), "冲突"))
            .collect();
        let mut state = with_results(clauses);

        let mut prev_count = state.visible_count;
        let mut prev_shown = state.visible_clauses().len();
        for _ in 0..5 {
            state.expand_visible();
            assert!(state.visible_count >= prev_count);
            let shown = state.visible_clauses().len();
            assert!(shown >= prev_shown);
            prev_count = state.visible_count;
            prev_shown = shown;
        }
        assert_eq!(state.visible_clauses().len(), 20);

        // Fully expanded: no further growth.
        let settled = state.visible_count;
        state.expand_visible();
        assert_eq!(state.visible_count, settled);
    }

    #[test]
    fn select_clause_signals_scroll() {
        let mut state = with_results(vec![clause("L-001", "冲突"), clause("L-002", "缺失")]);
        let effect = state.select_clause("L-002");
        assert_eq!(effect, Effect::ScrollDetailTop);
        assert_eq!(state.selected_clause().unwrap().id, "L-002");
    }

    #[test]
    fn selected_clause_lookup_misses_after_reset() {
        let mut state = with_results(vec![clause("L-001", "冲突")]);
        state.select_clause("L-001");
        state.set_targets(vec![opt("doc-D")]);
        assert!(state.selected_clause().is_none());
    }

    #[test]
    fn list_load_replaces_options_wholesale() {
        let mut state = ScreenState::new();
        let seq = state.begin_list_load();
        assert!(state.loading_lists);

        state.apply_list_load(seq, Ok(vec![opt("doc-A")]), Ok(vec![opt("doc-B")]));
        assert!(!state.loading_lists);
        assert_eq!(state.source_options.len(), 1);
        assert_eq!(state.target_options.len(), 1);

        let seq = state.begin_list_load();
        state.apply_list_load(seq, Ok(vec![opt("doc-X"), opt("doc-Y")]), Ok(vec![]));
        assert_eq!(state.source_options.len(), 2);
        assert!(state.target_options.is_empty());
    }

    #[test]
    fn failed_side_keeps_previous_options() {
        let mut state = ScreenState::new();
        let seq = state.begin_list_load();
        state.apply_list_load(seq, Ok(vec![opt("doc-A")]), Ok(vec![opt("doc-B")]));

        let seq = state.begin_list_load();
        state.apply_list_load(
            seq,
            Err("HTTP request failed".to_string()),
            Ok(vec![opt("doc-C")]),
        );
        assert!(!state.loading_lists);
        assert_eq!(state.source_options[0].id, "doc-A", "kept previous list");
        assert_eq!(state.target_options[0].id, "doc-C");
        assert!(state.last_error.is_some());
    }

    #[test]
    fn stale_list_load_is_discarded() {
        let mut state = ScreenState::new();
        let old_seq = state.begin_list_load();
        let new_seq = state.begin_list_load();

        state.apply_list_load(old_seq, Ok(vec![opt("stale")]), Ok(vec![opt("stale")]));
        assert!(state.loading_lists, "newer load still pending");
        assert!(state.source_options.is_empty());

        state.apply_list_load(new_seq, Ok(vec![opt("fresh")]), Ok(vec![]));
        assert_eq!(state.source_options[0].id, "fresh");
    }
}
