//! Article extraction and industry-affiliation classification.
//!
//! Takes the raw efetch XML document and produces the qualifying articles in
//! document order. An article qualifies when at least one author affiliation
//! reads like a pharmaceutical/biotech company; everything else is dropped
//! whole. Individual malformed entries are skipped, never raised as errors.
//!
//! Selectors are written lowercase because html5ever lowercases tag names
//! while parsing.

use crate::error::{PubmedError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Sentinel used when no email address appears in any affiliation text
pub const NO_EMAIL: &str = "No email";

/// Industry keywords; at least one must appear in a qualifying affiliation
const INDUSTRY_KEYWORDS: &[&str] = &["pharma", "biotech"];

/// Corporate-entity keywords; at least one must appear in a qualifying affiliation
const CORPORATE_KEYWORDS: &[&str] = &["company", "corporation", "ltd"];

/// Academic keywords; any of these disqualifies an affiliation
const ACADEMIC_KEYWORDS: &[&str] = &["university", "institute"];

/// Email address pattern scanned over affiliation text
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// One qualifying article with its extracted metadata
#[derive(Debug, Clone, Default, Serialize)]
pub struct Article {
    /// PubMed ID
    pub pubmed_id: String,
    /// Article title
    pub title: String,
    /// Publication date; present components joined with "-", may be year-only
    pub publication_date: String,
    /// Author full names, duplicates collapsed, first-seen order
    pub authors: Vec<String>,
    /// Distinct qualifying company affiliation strings
    pub companies: Vec<String>,
    /// Comma-joined email addresses found in affiliation text, or [`NO_EMAIL`]
    pub email: String,
}

/// Classify an affiliation string as a pharmaceutical/biotech company.
///
/// The lowercased text must contain an industry keyword ("pharma",
/// "biotech") and a corporate-entity keyword ("company", "corporation",
/// "ltd"), and must not contain an academic keyword ("university",
/// "institute"). The conjunction deliberately narrows false positives from
/// academic-industry partnerships.
pub fn is_company_affiliation(affiliation: &str) -> bool {
    let text = affiliation.to_lowercase();

    INDUSTRY_KEYWORDS.iter().any(|k| text.contains(k))
        && CORPORATE_KEYWORDS.iter().any(|k| text.contains(k))
        && !ACADEMIC_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Parse an efetch XML document into the qualifying articles.
///
/// # Arguments
///
/// * `xml` - Raw efetch response body
///
/// # Returns
///
/// Qualifying articles in document order, possibly empty. Entries without a
/// title or without a qualifying affiliation are dropped.
pub fn parse_article_batch(xml: &str) -> Result<Vec<Article>> {
    let document = Html::parse_document(xml);

    let article_sel = parse_selector("pubmedarticle")?;
    let pmid_sel = parse_selector("pmid")?;
    let title_sel = parse_selector("articletitle")?;
    let pubdate_sel = parse_selector("pubdate")?;
    let year_sel = parse_selector("year")?;
    let month_sel = parse_selector("month")?;
    let day_sel = parse_selector("day")?;
    let author_sel = parse_selector("authorlist author")?;
    let lastname_sel = parse_selector("lastname")?;
    let forename_sel = parse_selector("forename")?;
    let affiliation_sel = parse_selector("affiliationinfo affiliation")?;

    let email_regex =
        Regex::new(EMAIL_PATTERN).map_err(|e| PubmedError::Parse(e.to_string()))?;

    let mut articles = Vec::new();

    for entry in document.select(&article_sel) {
        let title = select_text(entry, &title_sel);

        // Entries without a title are skipped outright
        if title.is_empty() {
            continue;
        }

        let pubmed_id = select_text(entry, &pmid_sel);
        let publication_date = entry
            .select(&pubdate_sel)
            .next()
            .map(|pd| join_date_parts(pd, &year_sel, &month_sel, &day_sel))
            .unwrap_or_default();

        let mut authors: Vec<String> = Vec::new();
        let mut companies: Vec<String> = Vec::new();

        for author in entry.select(&author_sel) {
            let last_name = select_text(author, &lastname_sel);
            let fore_name = select_text(author, &forename_sel);

            let full_name = match (fore_name.is_empty(), last_name.is_empty()) {
                (false, false) => format!("{} {}", fore_name, last_name),
                (false, true) => fore_name,
                (true, false) => last_name,
                (true, true) => String::new(),
            };
            if !full_name.is_empty() && !authors.contains(&full_name) {
                authors.push(full_name);
            }

            for affiliation in author.select(&affiliation_sel) {
                let text = element_text(affiliation);
                if is_company_affiliation(&text) && !companies.contains(&text) {
                    companies.push(text);
                }
            }
        }

        // The whole entry is dropped unless some affiliation qualified
        if companies.is_empty() {
            continue;
        }

        let mut emails: Vec<String> = Vec::new();
        for affiliation in entry.select(&affiliation_sel) {
            let text = element_text(affiliation);
            for m in email_regex.find_iter(&text) {
                let email = m.as_str().to_string();
                if !emails.contains(&email) {
                    emails.push(email);
                }
            }
        }
        let email = if emails.is_empty() {
            NO_EMAIL.to_string()
        } else {
            emails.join(", ")
        };

        articles.push(Article {
            pubmed_id,
            title,
            publication_date,
            authors,
            companies,
            email,
        });
    }

    Ok(articles)
}

/// Parse a selector literal
fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PubmedError::Parse(e.to_string()))
}

/// Trimmed text of the first element matching `selector` under `scope`
fn select_text(scope: ElementRef, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Trimmed text content of an element
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Join the present year/month/day components of a PubDate with "-".
///
/// Absent components are omitted rather than leaving dangling separators, so
/// a year-only date comes out as just the year.
fn join_date_parts(
    pub_date: ElementRef,
    year_sel: &Selector,
    month_sel: &Selector,
    day_sel: &Selector,
) -> String {
    [
        select_text(pub_date, year_sel),
        select_text(pub_date, month_sel),
        select_text(pub_date, day_sel),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("-")
}
