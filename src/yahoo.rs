use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};

use crate::rank::{RankError, RankPage, RankSource};

const SEARCH_URL: &str = "https://search.yahoo.co.jp/search";

/// Structural marker for one organic result on the Yahoo! JAPAN results
/// page. Not contractual; when the layout changes only this module needs
/// adjusting.
const RESULT_CARD: &str = "div.Sw-Card";

/// Rank lookup that scrapes Yahoo! JAPAN search-result pages. There is no
/// next-page indicator; a page with zero result cards ends the scan.
pub struct YahooRank {
    client: Client,
    endpoint: String,
}

impl YahooRank {
    pub fn new() -> Self {
        Self::with_endpoint(SEARCH_URL)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        YahooRank {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

impl Default for YahooRank {
    fn default() -> Self {
        Self::new()
    }
}

impl RankSource for YahooRank {
    fn fetch_page(&self, query: &str, start: u32) -> Result<RankPage, RankError> {
        let start = start.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("p", query), ("b", start.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!("Yahoo search returned {} for '{}'", status, query);
            return Err(RankError::BadResponse(format!(
                "Yahoo search status {}",
                status
            )));
        }

        let html = response.text()?;
        Ok(parse_result_page(&html))
    }
}

/// Extracts one link per result card, in display order. A card with no
/// anchor still occupies its position, so ranks stay aligned with what the
/// page shows.
fn parse_result_page(html: &str) -> RankPage {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(RESULT_CARD).unwrap();
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let links: Vec<String> = document
        .select(&card_selector)
        .map(|card| {
            card.select(&anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    RankPage {
        more: !links.is_empty(),
        links,
    }
}
