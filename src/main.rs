//! rustpubmed - PubMed Industry-Affiliation Paper Finder
//!
//! A command-line tool for querying PubMed articles and keeping the ones
//! with at least one pharmaceutical/biotech company affiliated author.
//!
//! ## Usage
//!
//! ```bash
//! rustpubmed -q "DNA" -f results.csv    # save results to results.csv
//! rustpubmed -q "DNA" -d                # print to console with debug logging
//! rustpubmed -q "DNA" -n 10             # stop after 10 qualifying articles
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use rustpubmed::client::PubmedClient;
use rustpubmed::config::PubmedConfig;
use rustpubmed::parse::Article;
use rustpubmed::pipeline::{self, DEFAULT_PAGE_SIZE};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// PubMed Industry-Affiliation Paper Finder
#[derive(Parser)]
#[command(name = "rustpubmed")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Search query for PubMed
    #[arg(short, long)]
    query: String,

    /// Save the results to a CSV file instead of printing them
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Number of qualifying articles to collect
    #[arg(short, long, default_value_t = 100)]
    number: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    let config = PubmedConfig::from_env();
    let client = PubmedClient::new(config)?;

    // Best-effort spinner for console runs; cleared before any output and
    // on failure, with no effect on the fetch outcome
    let spinner = if cli.file.is_none() {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Fetching articles...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result =
        pipeline::fetch_filtered_articles(&client, &cli.query, cli.number, DEFAULT_PAGE_SIZE)
            .await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    // A remote failure aborts the run here; nothing is written
    let articles = result.context("Failed to fetch articles")?;

    match cli.file {
        Some(path) => {
            save_csv(&path, &articles)?;
            println!("Results saved to {}", path.display());
        }
        None => print_articles(&articles),
    }

    Ok(())
}

/// CSV row with the fixed output columns
#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "PubMed ID")]
    pubmed_id: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Corresponding Author Email")]
    email: &'a str,
}

/// Save articles to a CSV file
fn save_csv(path: &Path, articles: &[Article]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context("Failed to create CSV writer")?;

    for article in articles {
        wtr.serialize(CsvRow {
            pubmed_id: &article.pubmed_id,
            title: &article.title,
            authors: article.authors.join(", "),
            date: &article.publication_date,
            company: article.companies.join(", "),
            email: &article.email,
        })
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Print articles to the console, one block per article
fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No qualifying articles found.");
        return;
    }

    for article in articles {
        println!("\n--- Article Details ---");
        println!("PubMed ID: {}", article.pubmed_id);
        println!("Title: {}", article.title);
        println!("Authors: {}", article.authors.join(", "));
        println!("Date: {}", article.publication_date);
        println!("Company: {}", article.companies.join(", "));
        println!("Corresponding Author Email: {}", article.email);
    }
}
