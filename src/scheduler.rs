use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

const POLL_INTERVAL: Duration = Duration::from_secs(60);
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Flips the scheduler's stop flag from another thread.
#[derive(Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Fixed-cadence ticker. Owns the recurring loop: run the job immediately,
/// then poll at a coarse interval until the cadence elapses again. Missed
/// triggers while the process was down are not made up, and the last run
/// time is not persisted across restarts.
pub struct Scheduler {
    interval: Duration,
    poll: Duration,
    stop: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn every_days(days: u64) -> Self {
        Self::new(Duration::from_secs(days * SECONDS_PER_DAY), POLL_INTERVAL)
    }

    pub fn new(interval: Duration, poll: Duration) -> Self {
        Scheduler {
            interval,
            poll,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    /// Blocks until stopped. A failing cycle is logged and the loop keeps
    /// going; the next trigger still fires.
    pub fn run<E: Display>(&self, mut job: impl FnMut() -> Result<(), E>) {
        run_cycle(&mut job);
        let mut last_run = Instant::now();

        info!("Scheduler started. Waiting for scheduled tasks...");

        while !self.stop.load(Ordering::Relaxed) {
            thread::sleep(self.poll);
            if last_run.elapsed() >= self.interval {
                run_cycle(&mut job);
                last_run = Instant::now();
            }
        }

        info!("Scheduler stopped.");
    }
}

fn run_cycle<E: Display>(job: &mut impl FnMut() -> Result<(), E>) {
    if let Err(e) = job() {
        error!("Error updating rankings: {}", e);
    }
}
