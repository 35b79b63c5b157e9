pub mod config;
pub mod delay;
pub mod google;
pub mod logger;
pub mod processor;
pub mod rank;
pub mod runner;
pub mod scheduler;
pub mod sheets;
pub mod targets;
pub mod yahoo;

// Exporting types for convenience
pub use config::Config;
pub use delay::{DelayPolicy, JitterDelay, NoDelay};
pub use google::GoogleRank;
pub use processor::{process_target, ResultRow, NOT_DISPLAYED};
pub use rank::{resolve_rank, RankError, RankPage, RankSource};
pub use scheduler::Scheduler;
pub use sheets::{RowSink, SheetsClient};
pub use targets::Target;
pub use yahoo::YahooRank;
