// src/main.rs
mod extractors;
mod kg;
mod pmc;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pmc::models::ArticleRecord;
use storage::ArticleStore;
use utils::AppError;

/// Command Line Interface for the publication scraper and graph builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape article pages listed in a CSV and store one JSON record each
    Scrape {
        /// CSV file with Title,Link columns
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for stored article records
        #[arg(short, long, default_value = "./articles")]
        store_dir: PathBuf,

        /// Stop after this many articles (debugging aid)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Build the article/entity knowledge graph from stored records
    Graph {
        /// Directory holding stored article records
        #[arg(short, long, default_value = "./articles")]
        store_dir: PathBuf,

        /// Output path for the graph JSON
        #[arg(short, long, default_value = "./knowledge_graph.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    match args.command {
        Command::Scrape {
            input,
            store_dir,
            limit,
        } => run_scrape(input, store_dir, limit).await,
        Command::Graph { store_dir, out } => run_graph(store_dir, out),
    }
}

/// Sequential scrape: one article is fully fetched, extracted, and stored
/// before the next begins. Failures are isolated per article.
async fn run_scrape(
    input: PathBuf,
    store_dir: PathBuf,
    limit: Option<usize>,
) -> Result<(), AppError> {
    let links = pmc::input::read_links(&input)?;
    if links.is_empty() {
        return Err(AppError::Config(format!(
            "No article links found in {}",
            input.display()
        )));
    }

    let store = ArticleStore::new(&store_dir)?;

    let mut success_count = 0;
    let mut failure_count = 0;

    for link in links.iter().take(limit.unwrap_or(usize::MAX)) {
        tracing::info!("Processing article: {}", link.title);

        let html = match pmc::client::fetch_article(&link.link).await {
            Ok(html) => {
                tracing::info!("Successfully downloaded document ({} bytes)", html.len());
                html
            }
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", link.link, e);
                failure_count += 1;
                continue;
            }
        };

        // Extraction never fails: absent sections become "Not Found" in the
        // assembled record.
        let sections = extractors::extract_article(&html);
        let record = ArticleRecord::assemble(link, sections);
        tracing::info!(
            "Extracted sections for '{}': abstract={}, results={}, conclusions={}, authors={}",
            record.title,
            record.abstract_or_none().is_some(),
            record.results_and_discussion != pmc::models::NOT_FOUND,
            record.conclusions != pmc::models::NOT_FOUND,
            record.num_authors
        );

        match store.save(&record) {
            Ok(path) => {
                tracing::info!("Saved article record to: {}", path.display());
                success_count += 1;
                pmc::client::throttle().await;
            }
            Err(e) => {
                tracing::error!("Failed to save article record: {}", e);
                failure_count += 1;
            }
        }
    }

    tracing::info!(
        "Scrape finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to process any of {} articles",
            failure_count
        )));
    }

    Ok(())
}

/// Secondary batch: load stored records, mine entities, write the graph.
fn run_graph(store_dir: PathBuf, out: PathBuf) -> Result<(), AppError> {
    let store = ArticleStore::new(&store_dir)?;
    let records = store.load_all()?;
    tracing::info!("Loaded {} stored article records", records.len());

    if records.is_empty() {
        return Err(AppError::Config(format!(
            "No stored records found in {}",
            store_dir.display()
        )));
    }

    let recognizer = kg::recognizer::CapitalizedPhraseRecognizer;
    let graph = kg::build_graph(&records, &recognizer);
    graph.write_json(&out)?;

    Ok(())
}
