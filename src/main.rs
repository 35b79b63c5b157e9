use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rank_checker_lib::{logger, runner, scheduler::Scheduler, Config};

/// SEO Rank Checker
#[derive(Parser)]
#[command(name = "seo-rank-checker", about = "SEO Rank Checker")]
struct Cli {
    /// Run the rank checker once and exit
    #[arg(long)]
    run_once: bool,
}

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();

    info!("Starting SEO Rank Checker...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.run_once {
        match runner::update_rankings(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Error updating rankings: {}", e);
                ExitCode::FAILURE
            }
        }
    } else {
        let scheduler = Scheduler::every_days(config.interval_days);
        scheduler.run(|| runner::update_rankings(&config));
        ExitCode::SUCCESS
    }
}
