//! Configuration for the PubMed E-utilities endpoints.
//!
//! The base URL and service key are sourced from the environment once, up
//! front, and carried in an explicit [`PubmedConfig`] value that gets passed
//! into the client. Nothing deeper in the pipeline reads ambient state.

use std::env;

/// Public NCBI E-utilities base URL, used when `PUBMED_API_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Environment variable overriding the E-utilities base URL
pub const ENV_BASE_URL: &str = "PUBMED_API_URL";

/// Environment variable holding the NCBI API key
pub const ENV_API_KEY: &str = "PUBMED_API_KEY";

/// Endpoint configuration passed into [`crate::client::PubmedClient`]
#[derive(Debug, Clone)]
pub struct PubmedConfig {
    /// E-utilities base URL (no trailing slash)
    pub base_url: String,
    /// NCBI API key, appended to requests when present
    pub api_key: Option<String>,
}

impl PubmedConfig {
    /// Build a config from the environment.
    ///
    /// `PUBMED_API_URL` overrides the public E-utilities base URL;
    /// `PUBMED_API_KEY` supplies the optional service key. Empty values are
    /// treated as unset.
    pub fn from_env() -> Self {
        let base_url = env::var(ENV_BASE_URL)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = env::var(ENV_API_KEY).ok().filter(|s| !s.trim().is_empty());

        Self { base_url, api_key }
    }

    /// Config pointing at an explicit base URL with no key, mainly for tests
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }
}

impl Default for PubmedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_eutils() {
        let config = PubmedConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = PubmedConfig::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }
}
