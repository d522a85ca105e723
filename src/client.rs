//! PubMed E-utilities API client.
//!
//! Two endpoints back the pipeline:
//! - `esearch.fcgi` - keyword search returning a paged, ordered PMID list (JSON)
//! - `efetch.fcgi` - batch detail fetch for a PMID list (XML)
//!
//! Both take the service key from [`PubmedConfig`] when one is configured.
//! Request parameters are traced at debug level with the key omitted.

use crate::config::PubmedConfig;
use crate::error::{PubmedError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the PubMed search and detail-fetch endpoints
pub struct PubmedClient {
    http: reqwest::Client,
    config: PubmedConfig,
}

/// esearch JSON envelope
#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

impl PubmedClient {
    /// Create a new client for the configured endpoints
    pub fn new(config: PubmedConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rustpubmed/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PubmedError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Search PubMed for a query, returning one page of PMIDs.
    ///
    /// # Arguments
    ///
    /// * `query` - Search term
    /// * `retmax` - Page size
    /// * `retstart` - Offset of the page
    ///
    /// # Returns
    ///
    /// Ordered PMID list for the page. An empty list means the query is
    /// exhausted at this offset.
    pub async fn search(&self, query: &str, retmax: usize, retstart: usize) -> Result<Vec<String>> {
        let url = build_esearch_url(&self.config, query, retmax, retstart)?;

        debug!(
            query = query,
            retmax = retmax,
            retstart = retstart,
            "Querying PubMed esearch"
        );

        let response = self.http.get(url.as_str()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PubmedError::Api {
                code: status.as_u16() as i32,
                message: format!("PubMed esearch error: {} - {}", status, body),
            });
        }

        let data: EsearchResponse = response.json().await.map_err(|e| {
            PubmedError::Parse(format!("Failed to decode esearch response: {}", e))
        })?;

        Ok(data.esearchresult.idlist)
    }

    /// Fetch article details for a batch of PMIDs as one raw XML document.
    ///
    /// Must not be called with an empty PMID list; the pagination driver
    /// skips empty pages before getting here.
    pub async fn fetch_details(&self, pmids: &[String]) -> Result<String> {
        debug_assert!(!pmids.is_empty(), "fetch_details called with no PMIDs");

        let url = build_efetch_url(&self.config, pmids)?;

        debug!(count = pmids.len(), "Fetching PubMed article details");

        let response = self.http.get(url.as_str()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PubmedError::Api {
                code: status.as_u16() as i32,
                message: format!("PubMed efetch error: {} - {}", status, body),
            });
        }

        response.text().await.map_err(PubmedError::Network)
    }
}

/// Build the esearch URL for one page of results
fn build_esearch_url(
    config: &PubmedConfig,
    query: &str,
    retmax: usize,
    retstart: usize,
) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/esearch.fcgi", config.base_url))
        .map_err(|e| PubmedError::Config(format!("Invalid base URL: {}", e)))?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("db", "pubmed");
        params.append_pair("term", query);
        params.append_pair("retmode", "json");
        params.append_pair("retmax", &retmax.to_string());
        params.append_pair("retstart", &retstart.to_string());
        if let Some(key) = &config.api_key {
            params.append_pair("api_key", key);
        }
    }

    Ok(url)
}

/// Build the efetch URL for a PMID batch
fn build_efetch_url(config: &PubmedConfig, pmids: &[String]) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/efetch.fcgi", config.base_url))
        .map_err(|e| PubmedError::Config(format!("Invalid base URL: {}", e)))?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("db", "pubmed");
        params.append_pair("id", &pmids.join(","));
        params.append_pair("retmode", "xml");
        if let Some(key) = &config.api_key {
            params.append_pair("api_key", key);
        }
    }

    Ok(url)
}
