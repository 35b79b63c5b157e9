use std::collections::VecDeque;
use std::sync::Mutex;
use std::thread;

use chrono::Local;
use log::info;
use thiserror::Error;

use crate::config::Config;
use crate::delay::{DelayPolicy, JitterDelay};
use crate::google::GoogleRank;
use crate::processor::process_target;
use crate::rank::RankSource;
use crate::sheets::{RowSink, SheetsClient, SheetsError};
use crate::targets::{load_targets, Target, TargetsError};
use crate::yahoo::YahooRank;

/// Upper bound on simultaneous per-target workers.
pub const MAX_WORKERS: usize = 5;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Targets(#[from] TargetsError),
    #[error(transparent)]
    Sheets(#[from] SheetsError),
}

/// One full update cycle: load the target list, authenticate to the sheet,
/// stamp the run, and process every target. Per-target failures are logged
/// inside the processor and never fail the run; only setup errors do.
pub fn update_rankings(config: &Config) -> Result<(), RunError> {
    let targets = load_targets(&config.targets_csv)?;
    let sheets = SheetsClient::connect(&config.credentials_path, &config.spreadsheet_id)?;
    let google = GoogleRank::new(&config.api_key, &config.cse_id);
    let yahoo = YahooRank::new();

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    run_targets(targets, &google, &yahoo, &JitterDelay, &sheets, &timestamp);

    info!(
        "Updated rankings at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

/// Fans the target list out over at most [`MAX_WORKERS`] threads pulling
/// from one shared queue. Each target is owned by exactly one worker and
/// appends its row independently.
pub fn run_targets(
    targets: Vec<Target>,
    google: &dyn RankSource,
    yahoo: &dyn RankSource,
    delay: &dyn DelayPolicy,
    sink: &dyn RowSink,
    timestamp: &str,
) {
    let total = targets.len();
    let workers = MAX_WORKERS.min(total);
    let queue = Mutex::new(VecDeque::from(targets));

    info!("Processing {} targets with {} workers", total, workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let next = queue.lock().unwrap().pop_front();
                match next {
                    Some(target) => process_target(&target, google, yahoo, delay, sink, timestamp),
                    None => break,
                }
            });
        }
    });
}
