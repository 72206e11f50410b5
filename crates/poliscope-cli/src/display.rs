//! Terminal rendering for document lists, segments, and comparison results.

use poliscope_client::{DocumentList, IngestReceipt, ParsedDocument, SegmentList};
use poliscope_view::ScreenState;

/// Characters of clause text shown in list rows before truncation.
const EXCERPT_CHARS: usize = 60;

/// Print a document collection as a labelled table.
pub fn print_document_list(header: &str, list: &DocumentList) {
    println!("=== {} ===", header);
    if !list.dataset.name.is_empty() {
        println!("collection: {} ({} documents)", list.dataset.name, list.total);
    }
    println!();

    if list.documents.is_empty() {
        println!("  (no documents)");
        println!();
        return;
    }

    for doc in &list.documents {
        let option = doc.to_option();
        println!("  {:<26} {}", doc.id, option.label);
        if !doc.status.is_empty() {
            println!("    {:<24} {}", "status", doc.status);
        }
        if doc.parsing_payload.chunk_count > 0 {
            println!("    {:<24} {}", "segments", doc.parsing_payload.chunk_count);
        }
        if let Some(date) = short_date(&doc.created_at) {
            println!("    {:<24} {}", "created", date);
        }
    }
    println!();
}

/// Print the ordered segments of one document.
pub fn print_segments(list: &SegmentList) {
    println!("=== {} ===", list.doc_id);
    println!("{} segments", list.count);
    println!();

    for seg in &list.data {
        println!("  [{:>4}] {}", seg.position, excerpt(&seg.content, EXCERPT_CHARS));
        print!("         {} chars, {} tokens, {}", seg.word_count, seg.tokens, seg.status);
        if !seg.enabled {
            print!("  (disabled)");
        }
        if seg.hit_count > 0 {
            print!("  {} hits", seg.hit_count);
        }
        println!();
    }
    println!();
}

/// Print a parsed-document summary card.
pub fn print_parsed(doc: &ParsedDocument) {
    println!("=== {} ===", doc.doc_id);
    print_field("file", &doc.file.name);
    println!("  {:<26} {}", "content chars", doc.content.chars().count());
    println!(
        "  {:<26} {} chapters, {} sections, {} articles",
        "structure", doc.counts.chapters, doc.counts.sections, doc.counts.articles
    );
    if let Some(keywords) = doc.keywords.as_array() {
        let words: Vec<&str> = keywords.iter().filter_map(|k| k.as_str()).collect();
        if !words.is_empty() {
            println!("  {:<26} {}", "keywords", words.join(", "));
        }
    }
    println!();
}

/// Print an ingest receipt.
pub fn print_ingest(receipt: &IngestReceipt) {
    println!("=== ingested ===");
    print_field("doc_id", &receipt.doc_id);
    print_field("collection", &receipt.collection_id);
    println!("  {:<26} {}", "segments", receipt.chunk_count);
    println!(
        "  {:<26} {} attempted, {} uploaded, {} failed",
        "embeddings",
        receipt.embedding_stats.attempted,
        receipt.embedding_stats.uploaded,
        receipt.embedding_stats.failed
    );
    println!();
}

/// Print the visible clause rows and the selected clause's detail card.
pub fn print_comparison(state: &ScreenState) {
    let markers = state.markers();
    let differences = state
        .compare_results
        .iter()
        .filter(|c| c.has_difference(markers))
        .count();

    println!(
        "{} clauses compared, {} with differences",
        state.compare_results.len(),
        differences
    );
    if state.diff_only {
        println!("showing differences only");
    }
    println!();

    let visible = state.visible_clauses();
    if visible.is_empty() {
        println!("  (no clauses to show)");
        println!();
        return;
    }

    for clause in &visible {
        let verdict = state.markers().verdict(&clause.diff_classification);
        println!("  {}  [{}]", clause.title(), verdict.as_str());
        if !clause.diff_summary().is_empty() {
            println!("    {}", excerpt(clause.diff_summary(), EXCERPT_CHARS));
        }
    }
    if state.has_more() {
        println!(
            "  ... {} of {} shown",
            visible.len(),
            state.compare_results.len()
        );
    }
    println!();

    if let Some(clause) = state.selected_clause() {
        println!("=== {} ===", clause.title());
        println!();
        println!("analysis");
        println!("  {}", clause.display_analysis(markers));
        println!();

        if clause.matched.is_empty() {
            println!("  未找到与该地方条款对应的国家条款");
        }
        for target in &clause.matched {
            println!("{}", target.label);
            if target.excerpt.is_empty() {
                println!("  （暂无条款内容）");
            } else {
                println!("  {}", target.excerpt);
            }
            println!();
        }
    }
}

// ── Helpers ──

fn print_field(name: &str, value: &str) {
    if !value.is_empty() {
        println!("  {:<26} {}", name, value);
    }
}

/// Truncate to `max_chars` characters, on char boundaries.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

/// Date part of an RFC 3339 timestamp, if it parses.
fn short_date(timestamp: &str) -> Option<String> {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}
