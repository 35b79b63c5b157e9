use log::{error, info};
use thiserror::Error;

use crate::delay::DelayPolicy;
use crate::rank::{resolve_rank, RankError, RankSource, DEFAULT_MAX_RESULTS};
use crate::sheets::{RowSink, SheetsError};
use crate::targets::Target;

/// Cell value written when a target URL never appeared within the cap.
pub const NOT_DISPLAYED: &str = "not displayed";

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("rank lookup failed: {0}")]
    Rank(#[from] RankError),
    #[error("sheet append failed: {0}")]
    Sheet(#[from] SheetsError),
}

/// One appended spreadsheet row. All targets of a run share the same
/// timestamp so their rows stay comparable in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub timestamp: String,
    pub keyword: String,
    pub url: String,
    pub rank_google: String,
    pub rank_yahoo: String,
}

impl ResultRow {
    pub fn new(
        timestamp: &str,
        target: &Target,
        rank_google: Option<u32>,
        rank_yahoo: Option<u32>,
    ) -> Self {
        ResultRow {
            timestamp: timestamp.to_string(),
            keyword: target.keyword.clone(),
            url: target.url.clone(),
            rank_google: render_rank(rank_google),
            rank_yahoo: render_rank(rank_yahoo),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.keyword.clone(),
            self.url.clone(),
            self.rank_google.clone(),
            self.rank_yahoo.clone(),
        ]
    }
}

fn render_rank(rank: Option<u32>) -> String {
    match rank {
        Some(position) => position.to_string(),
        None => NOT_DISPLAYED.to_string(),
    }
}

/// Resolves both providers for one target and appends the result row.
/// Everything that can go wrong here is logged with the target's identity
/// and swallowed; a failing target must not abort its siblings.
pub fn process_target(
    target: &Target,
    google: &dyn RankSource,
    yahoo: &dyn RankSource,
    delay: &dyn DelayPolicy,
    sink: &dyn RowSink,
    timestamp: &str,
) {
    if let Err(e) = try_process(target, google, yahoo, delay, sink, timestamp) {
        error!(
            "Error processing target '{}' ({}): {}",
            target.keyword, target.url, e
        );
    }
}

fn try_process(
    target: &Target,
    google: &dyn RankSource,
    yahoo: &dyn RankSource,
    delay: &dyn DelayPolicy,
    sink: &dyn RowSink,
    timestamp: &str,
) -> Result<(), ProcessError> {
    let rank_google = resolve_rank(
        google,
        delay,
        &target.keyword,
        &target.url,
        DEFAULT_MAX_RESULTS,
    )?;
    let rank_yahoo = resolve_rank(
        yahoo,
        delay,
        &target.keyword,
        &target.url,
        DEFAULT_MAX_RESULTS,
    )?;

    let row = ResultRow::new(timestamp, target, rank_google, rank_yahoo);
    sink.append_row(&row.cells())?;

    info!(
        "Successfully updated ranks for keyword: '{}'",
        target.keyword
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use crate::rank::{RankPage, PAGE_SIZE};
    use std::sync::Mutex;

    pub(crate) struct MemorySink {
        pub rows: Mutex<Vec<Vec<String>>>,
    }

    impl MemorySink {
        pub(crate) fn new() -> Self {
            MemorySink {
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    impl RowSink for MemorySink {
        fn append_row(&self, row: &[String]) -> Result<(), SheetsError> {
            self.rows.lock().unwrap().push(row.to_vec());
            Ok(())
        }
    }

    /// Yields the target URL at one fixed absolute position, or never.
    pub(crate) struct FixedRankSource {
        pub position: Option<u32>,
        pub target_link: String,
    }

    impl RankSource for FixedRankSource {
        fn fetch_page(&self, _query: &str, start: u32) -> Result<RankPage, RankError> {
            let links = (start..start + PAGE_SIZE)
                .map(|i| match self.position {
                    Some(p) if p == i => self.target_link.clone(),
                    _ => format!("http://other.test/{}", i),
                })
                .collect();
            Ok(RankPage { links, more: true })
        }
    }

    pub(crate) struct FailingSource;

    impl RankSource for FailingSource {
        fn fetch_page(&self, _query: &str, _start: u32) -> Result<RankPage, RankError> {
            Err(RankError::BadResponse("malformed body".to_string()))
        }
    }

    fn target() -> Target {
        Target {
            keyword: "k1".to_string(),
            url: "http://x.test/a".to_string(),
        }
    }

    #[test]
    fn builds_and_appends_the_expected_row() {
        let google = FixedRankSource {
            position: Some(3),
            target_link: "http://x.test/a".to_string(),
        };
        let yahoo = FixedRankSource {
            position: None,
            target_link: String::new(),
        };
        let sink = MemorySink::new();

        process_target(
            &target(),
            &google,
            &yahoo,
            &NoDelay,
            &sink,
            "2026-08-26 09:00:00",
        );

        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec![
                "2026-08-26 09:00:00",
                "k1",
                "http://x.test/a",
                "3",
                "not displayed"
            ]
        );
    }

    #[test]
    fn provider_failure_appends_no_row() {
        let yahoo = FixedRankSource {
            position: Some(1),
            target_link: "http://x.test/a".to_string(),
        };
        let sink = MemorySink::new();

        process_target(
            &target(),
            &FailingSource,
            &yahoo,
            &NoDelay,
            &sink,
            "2026-08-26 09:00:00",
        );

        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn absent_rank_renders_sentinel() {
        assert_eq!(render_rank(None), NOT_DISPLAYED);
        assert_eq!(render_rank(Some(12)), "12");
    }
}
