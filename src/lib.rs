//! # rustpubmed
//!
//! PubMed Industry-Affiliation Paper Finder
//!
//! Queries the PubMed E-utilities API, pages through results, and keeps the
//! articles with at least one pharmaceutical/biotech company affiliated
//! author.
//!
//! ## Modules
//!
//! - [`client`] - E-utilities search and detail-fetch client
//! - [`config`] - Endpoint configuration from the environment
//! - [`parse`] - Article extraction and affiliation classification
//! - [`pipeline`] - Pagination/accumulation driver
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustpubmed::{client::PubmedClient, config::PubmedConfig, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PubmedClient::new(PubmedConfig::from_env())?;
//!     let articles =
//!         pipeline::fetch_filtered_articles(&client, "DNA", 10, pipeline::DEFAULT_PAGE_SIZE)
//!             .await?;
//!     println!("Found {} qualifying articles", articles.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod pipeline;

pub use error::{PubmedError, Result};
