use log::debug;
use thiserror::Error;

use crate::delay::DelayPolicy;

/// Deepest position scanned before giving up.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Results per provider page.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum RankError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected search response: {0}")]
    BadResponse(String),
}

/// One page of search results: the result links in display order, and
/// whether the provider indicated that further pages exist.
#[derive(Debug, Clone)]
pub struct RankPage {
    pub links: Vec<String>,
    pub more: bool,
}

/// One page of results at a 1-based offset. Implemented per provider;
/// tests substitute scripted page streams.
pub trait RankSource: Send + Sync {
    fn fetch_page(&self, query: &str, start: u32) -> Result<RankPage, RankError>;
}

/// Scans concatenated result pages for the first link containing
/// `target_url` and returns its 1-based rank, or `None` if the URL does not
/// appear within `max_results` positions.
///
/// Matching is raw substring containment on the link, case-sensitive, with
/// no URL normalization. A longer result URL that merely embeds the target
/// will match; that looseness is intentional and kept as-is.
pub fn resolve_rank(
    source: &dyn RankSource,
    delay: &dyn DelayPolicy,
    query: &str,
    target_url: &str,
    max_results: u32,
) -> Result<Option<u32>, RankError> {
    let mut start = 1;

    while start <= max_results {
        let page = source.fetch_page(query, start)?;

        if page.links.is_empty() {
            debug!("No results at offset {} for '{}'", start, query);
            return Ok(None);
        }

        for (i, link) in page.links.iter().enumerate() {
            let position = start + i as u32;
            if position > max_results {
                return Ok(None);
            }
            if link.contains(target_url) {
                return Ok(Some(position));
            }
        }

        if !page.more {
            return Ok(None);
        }

        start += PAGE_SIZE;
        if start <= max_results {
            delay.pause();
        }
    }

    Ok(None)
}
