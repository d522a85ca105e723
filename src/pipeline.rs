//! Pagination and accumulation driver.
//!
//! Pages through the search results strictly sequentially, fetching and
//! classifying each batch until the desired number of qualifying articles is
//! collected or the query is exhausted. Any remote failure aborts the whole
//! run; there is no partial result on error.

use crate::client::PubmedClient;
use crate::error::Result;
use crate::parse::{parse_article_batch, Article};
use tracing::{debug, info};

/// Default page size for the search stage
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Fetch qualifying articles for a query until `desired_count` is reached.
///
/// # Arguments
///
/// * `client` - Configured PubMed client
/// * `query` - Search term
/// * `desired_count` - Target number of qualifying articles
/// * `page_size` - PMIDs fetched per search page
///
/// # Returns
///
/// At most `desired_count` qualifying articles. Fewer are returned when the
/// query is exhausted first (a page with no PMIDs stops the loop, and no
/// detail fetch is made for it).
pub async fn fetch_filtered_articles(
    client: &PubmedClient,
    query: &str,
    desired_count: usize,
    page_size: usize,
) -> Result<Vec<Article>> {
    let mut collected: Vec<Article> = Vec::new();
    let mut retstart = 0;

    while collected.len() < desired_count {
        let pmids = client.search(query, page_size, retstart).await?;
        if pmids.is_empty() {
            debug!(retstart = retstart, "Search exhausted");
            break;
        }

        let xml = client.fetch_details(&pmids).await?;
        let articles = parse_article_batch(&xml)?;

        info!(
            retstart = retstart,
            page_total = pmids.len(),
            page_qualifying = articles.len(),
            collected = collected.len() + articles.len(),
            "Processed page"
        );

        collected.extend(articles);
        retstart += page_size;
    }

    collected.truncate(desired_count);
    Ok(collected)
}
