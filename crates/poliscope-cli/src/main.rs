mod display;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use poliscope_client::{BackendClient, SOURCE_COLLECTION, TARGET_COLLECTION};
use poliscope_core::{DocumentOption, DEFAULT_RESULT_LIMIT};
use poliscope_view::{CompareScreen, ScreenState};

#[derive(Parser)]
#[command(name = "poliscope", version, about = "Review local policy documents against national policy")]
struct Cli {
    /// Backend base URL.
    #[arg(
        long,
        global = true,
        env = "POLISCOPE_API_BASE",
        default_value = "http://localhost:10010"
    )]
    api_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the source and target document collections
    Docs,
    /// Show the ordered segments of a document
    Segments { doc_id: String },
    /// Show the parsed artifacts of a document
    Parsed { doc_id: String },
    /// Upload a document for parsing and indexing
    Ingest {
        file: PathBuf,
        /// Destination collection (defaults to the source collection)
        #[arg(long)]
        collection: Option<String>,
    },
    /// Compare one source document against target documents
    Compare {
        /// Source document id
        #[arg(long)]
        source: String,
        /// Target document id (repeatable)
        #[arg(long = "target", required = true)]
        targets: Vec<String>,
        /// Matched target clauses per source clause
        #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
        limit: u32,
        /// Include clauses without differences
        #[arg(long)]
        all_clauses: bool,
        /// Widen the result window until every clause is shown
        #[arg(long)]
        expand_all: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("poliscope v{}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();
    let client = BackendClient::new(cli.api_base);

    match cli.command {
        Command::Docs => docs(&client).await,
        Command::Segments { doc_id } => segments(&client, &doc_id).await,
        Command::Parsed { doc_id } => parsed(&client, &doc_id).await,
        Command::Ingest { file, collection } => ingest(&client, &file, collection).await,
        Command::Compare {
            source,
            targets,
            limit,
            all_clauses,
            expand_all,
        } => compare(client, &source, &targets, limit, all_clauses, expand_all).await,
    }
}

async fn docs(client: &BackendClient) -> anyhow::Result<()> {
    let (source, target) = tokio::join!(
        client.list_documents(SOURCE_COLLECTION),
        client.list_documents(TARGET_COLLECTION),
    );

    let source = source.context("listing source documents")?;
    let target = target.context("listing target documents")?;

    display::print_document_list("source documents", &source);
    display::print_document_list("target documents", &target);
    Ok(())
}

async fn segments(client: &BackendClient, doc_id: &str) -> anyhow::Result<()> {
    let list = client
        .document_segments(doc_id)
        .await
        .context("fetching document segments")?;
    display::print_segments(&list);
    Ok(())
}

async fn parsed(client: &BackendClient, doc_id: &str) -> anyhow::Result<()> {
    let doc = client
        .parsed_document(doc_id)
        .await
        .context("fetching parsed document")?;
    display::print_parsed(&doc);
    Ok(())
}

async fn ingest(
    client: &BackendClient,
    file: &PathBuf,
    collection: Option<String>,
) -> anyhow::Result<()> {
    eprintln!("Uploading {}...", file.display());
    let receipt = client
        .ingest_document(file, collection.as_deref())
        .await
        .context("ingesting document")?;
    display::print_ingest(&receipt);
    Ok(())
}

async fn compare(
    client: BackendClient,
    source: &str,
    targets: &[String],
    limit: u32,
    all_clauses: bool,
    expand_all: bool,
) -> anyhow::Result<()> {
    let mut state = ScreenState::new();
    state.result_limit = limit;
    state.set_diff_only(!all_clauses);
    let mut screen = CompareScreen::with_state(client, state);

    eprintln!("Loading document lists...");
    screen.load_lists().await;

    let source_opt = resolve(&screen.state.source_options, source)
        .with_context(|| format!("source document '{source}' not found"))?;
    let target_opts: Vec<DocumentOption> = targets
        .iter()
        .map(|t| {
            resolve(&screen.state.target_options, t)
                .with_context(|| format!("target document '{t}' not found"))
        })
        .collect::<anyhow::Result<_>>()?;

    screen.state.set_source(Some(source_opt));
    screen.state.set_targets(target_opts);

    eprintln!("Generating comparison ({} targets, limit {})...", targets.len(), limit);
    screen.generate().await;
    if let Some(err) = &screen.state.last_error {
        bail!("comparison failed: {err}");
    }

    if expand_all {
        loop {
            let before = screen.state.visible_clauses().len();
            screen.state.expand_visible();
            if screen.state.visible_clauses().len() == before {
                break;
            }
        }
    }

    display::print_comparison(&screen.state);
    Ok(())
}

/// Find an option by id, falling back to an exact label match.
fn resolve(options: &[DocumentOption], key: &str) -> anyhow::Result<DocumentOption> {
    options
        .iter()
        .find(|o| o.id == key)
        .or_else(|| options.iter().find(|o| o.label == key))
        .cloned()
        .context("no matching document option")
}
