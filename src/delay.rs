use std::thread;
use std::time::Duration;

use log::debug;
use rand::Rng;

/// Pause between paginated requests so we don't hammer the providers.
/// Injectable so tests can run without actually sleeping.
pub trait DelayPolicy: Send + Sync {
    fn pause(&self);
}

/// Random 1-2 second wait between result pages.
pub struct JitterDelay;

impl DelayPolicy for JitterDelay {
    fn pause(&self) {
        let mut rng = rand::thread_rng();
        let delay_ms = rng.gen_range(1000..=2000);
        debug!("Waiting {} ms before next result page...", delay_ms);
        thread::sleep(Duration::from_millis(delay_ms));
    }
}

/// No-op policy for tests.
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn pause(&self) {}
}
