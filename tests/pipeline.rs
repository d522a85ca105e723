//! Integration tests for the pagination/accumulation driver, run against a
//! mock E-utilities server so call counts can be asserted.

use rustpubmed::client::PubmedClient;
use rustpubmed::config::PubmedConfig;
use rustpubmed::pipeline::fetch_filtered_articles;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// esearch response body for a list of PMIDs
fn esearch_body(pmids: &[&str]) -> serde_json::Value {
    serde_json::json!({ "esearchresult": { "idlist": pmids } })
}

/// One PubmedArticle entry; qualifying entries get a company affiliation
fn article_entry(pmid: &str, qualifying: bool) -> String {
    let affiliation = if qualifying {
        "Acme Pharma Company Ltd, Basel, Switzerland."
    } else {
        "Department of Biology, Example University, Springfield."
    };
    format!(
        "<PubmedArticle><MedlineCitation><PMID>{pmid}</PMID><Article>\
         <ArticleTitle>Article {pmid}</ArticleTitle>\
         <Journal><JournalIssue><PubDate><Year>2024</Year></PubDate></JournalIssue></Journal>\
         <AuthorList><Author><LastName>Doe</LastName><ForeName>Jane</ForeName>\
         <AffiliationInfo><Affiliation>{affiliation}</Affiliation></AffiliationInfo>\
         </Author></AuthorList></Article></MedlineCitation></PubmedArticle>"
    )
}

/// efetch response body with the first `qualifying` entries qualifying
fn efetch_body(pmids: &[&str], qualifying: usize) -> String {
    let entries: String = pmids
        .iter()
        .enumerate()
        .map(|(i, pmid)| article_entry(pmid, i < qualifying))
        .collect();
    format!("<PubmedArticleSet>{}</PubmedArticleSet>", entries)
}

fn client_for(server: &MockServer) -> PubmedClient {
    PubmedClient::new(PubmedConfig::with_base_url(&server.uri()))
        .expect("Failed to build client")
}

#[tokio::test]
async fn single_page_meets_target_without_further_pagination() {
    let server = MockServer::start().await;

    let pmids: Vec<String> = (1..=100).map(|n| n.to_string()).collect();
    let pmid_refs: Vec<&str> = pmids.iter().map(String::as_str).collect();

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&pmid_refs)))
        .expect(1)
        .mount(&server)
        .await;

    // 5 qualifying entries among 100; the target is met on the first page
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_body(&pmid_refs, 5)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let articles = fetch_filtered_articles(&client, "DNA", 5, 100)
        .await
        .expect("Fetch failed");

    assert_eq!(articles.len(), 5);
    assert!(articles.iter().all(|a| !a.companies.is_empty()));
}

#[tokio::test]
async fn empty_page_stops_without_detail_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&[])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let articles = fetch_filtered_articles(&client, "DNA", 10, 100)
        .await
        .expect("Fetch failed");

    assert!(articles.is_empty());
}

#[tokio::test]
async fn result_truncated_to_target_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["1", "2", "3"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(efetch_body(&["1", "2", "3"], 3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let articles = fetch_filtered_articles(&client, "DNA", 2, 100)
        .await
        .expect("Fetch failed");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].pubmed_id, "1");
    assert_eq!(articles[1].pubmed_id, "2");
}

#[tokio::test]
async fn accumulates_across_pages_until_target() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["1", "2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_body(&["1", "2"], 1)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["3", "4"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "3,4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_body(&["3", "4"], 2)))
        .expect(1)
        .mount(&server)
        .await;

    // Target met after two pages; a third search must not happen
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let articles = fetch_filtered_articles(&client, "DNA", 3, 2)
        .await
        .expect("Fetch failed");

    assert_eq!(articles.len(), 3);
    let ids: Vec<&str> = articles.iter().map(|a| a.pubmed_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "4"]);
}

#[tokio::test]
async fn detail_fetch_failure_on_second_page_aborts_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["1", "2"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_body(&["1", "2"], 2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("retstart", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["3", "4"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "3,4"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    // Page 1 yielded 2 qualifying articles, but the page-2 failure discards them
    let result = fetch_filtered_articles(&client, "DNA", 5, 2).await;

    let err = result.expect_err("Run should abort");
    let message = err.to_string();
    assert!(message.contains("500"), "unexpected error: {}", message);
    assert!(message.contains("server exploded"), "unexpected error: {}", message);
}

#[tokio::test]
async fn malformed_search_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = fetch_filtered_articles(&client, "DNA", 5, 100).await;

    let err = result.expect_err("Decode should fail");
    assert!(err.to_string().contains("esearch"), "unexpected error: {}", err);
}

#[tokio::test]
async fn zero_target_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["1"])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let articles = fetch_filtered_articles(&client, "DNA", 0, 100)
        .await
        .expect("Fetch failed");

    assert!(articles.is_empty());
}
