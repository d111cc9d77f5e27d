//! Elapsed-time clock for the active session.
//!
//! A two-state machine: idle until a session goes in-progress, then a
//! spawned one-second ticker adds exactly one to the elapsed counter per
//! tick. Ticks that miss their slot are not replayed and the increment is
//! never derived from measured wall-clock deltas, so scheduling delay
//! accumulates as accepted imprecision rather than triggering
//! correction. On resume the counter is seeded once from the wall-clock
//! difference to the stored session start; ticking continues at
//! +1/second from the seed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Renders a seconds count as `M:SS` for the timer display.
pub fn format_mm_ss(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Counts elapsed seconds while armed.
#[derive(Debug)]
pub struct ElapsedClock {
    elapsed: Arc<AtomicU64>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(0)),
            ticker: Mutex::new(None),
        }
    }

    /// Starts the one-second ticker. No-op if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self) {
        let mut ticker = self.ticker.lock().unwrap();
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let elapsed = Arc::clone(&self.elapsed);
        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                elapsed.fetch_add(1, Ordering::Relaxed);
            }
        });
        *ticker = Some(handle);
    }

    /// Stops the ticker. The elapsed counter keeps its value.
    pub fn disarm(&self) {
        if let Some(handle) = self.ticker.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Returns true while the ticker task is alive.
    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Sets the counter, used once when adopting a resumed session.
    pub fn seed(&self, seconds: u64) {
        self.elapsed.store(seconds, Ordering::Relaxed);
    }

    /// Resets the counter to zero for a fresh session.
    pub fn reset(&self) {
        self.seed(0);
    }

    /// Seconds counted so far.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }
}

impl Default for ElapsedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ElapsedClock {
    fn drop(&mut self) {
        self.disarm();
    }
}
