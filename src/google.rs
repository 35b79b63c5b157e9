use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::rank::{RankError, RankPage, RankSource, PAGE_SIZE};

const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Rank lookup backed by the Google Custom Search JSON API.
pub struct GoogleRank {
    client: Client,
    endpoint: String,
    api_key: String,
    cse_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
    queries: Option<Queries>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

#[derive(Debug, Deserialize)]
struct Queries {
    #[serde(rename = "nextPage")]
    next_page: Option<serde_json::Value>,
}

impl GoogleRank {
    pub fn new(api_key: &str, cse_id: &str) -> Self {
        Self::with_endpoint(SEARCH_URL, api_key, cse_id)
    }

    pub fn with_endpoint(endpoint: &str, api_key: &str, cse_id: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        GoogleRank {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            cse_id: cse_id.to_string(),
        }
    }
}

impl RankSource for GoogleRank {
    fn fetch_page(&self, query: &str, start: u32) -> Result<RankPage, RankError> {
        let num = PAGE_SIZE.to_string();
        let start = start.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("start", start.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!("Custom Search API returned {} for '{}'", status, query);
            return Err(RankError::BadResponse(format!(
                "Custom Search API status {}",
                status
            )));
        }

        let body: SearchResponse = response.json()?;

        // No `items` means the result list is exhausted; no `nextPage` under
        // `queries` means this is the last available page (quota limits
        // included).
        let links = body
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| item.link)
            .collect();
        let more = body
            .queries
            .map_or(false, |queries| queries.next_page.is_some());

        Ok(RankPage { links, more })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use crate::rank::resolve_rank;
    use mockito::Matcher;

    fn page_body(links: &[&str], next_page: bool) -> String {
        let items: Vec<serde_json::Value> = links
            .iter()
            .map(|link| serde_json::json!({ "link": link, "title": "t" }))
            .collect();
        let mut body = serde_json::json!({ "items": items });
        if next_page {
            body["queries"] =
                serde_json::json!({ "nextPage": [{ "startIndex": links.len() + 1 }] });
        } else {
            body["queries"] = serde_json::json!({ "request": [] });
        }
        body.to_string()
    }

    #[test]
    fn parses_items_and_next_page_indicator() {
        let body: SearchResponse =
            serde_json::from_str(&page_body(&["http://a.test", "http://b.test"], true)).unwrap();
        assert_eq!(body.items.as_ref().unwrap().len(), 2);
        assert!(body.queries.unwrap().next_page.is_some());
    }

    #[test]
    fn missing_items_is_empty_page() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"queries": {"request": []}}"#).unwrap();
        assert!(body.items.is_none());
        assert!(body.queries.unwrap().next_page.is_none());
    }

    #[test]
    fn resolves_rank_through_http() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("cx".into(), "test-cx".into()),
                Matcher::UrlEncoded("q".into(), "k1".into()),
                Matcher::UrlEncoded("start".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(
                &["http://other.test/1", "http://other.test/2", "http://x.test/a"],
                true,
            ))
            .create();

        let source = GoogleRank::with_endpoint(&server.url(), "test-key", "test-cx");
        let rank = resolve_rank(&source, &NoDelay, "k1", "http://x.test/a", 50).unwrap();
        assert_eq!(rank, Some(3));
    }

    #[test]
    fn empty_response_resolves_to_not_found() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"queries": {"request": []}}"#)
            .create();

        let source = GoogleRank::with_endpoint(&server.url(), "k", "cx");
        let rank = resolve_rank(&source, &NoDelay, "k1", "http://x.test/a", 50).unwrap();
        assert_eq!(rank, None);
    }

    #[test]
    fn server_error_propagates() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create();

        let source = GoogleRank::with_endpoint(&server.url(), "k", "cx");
        let result = source.fetch_page("k1", 1);
        assert!(result.is_err());
    }
}
