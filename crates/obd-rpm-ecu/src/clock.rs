//! Elapsed-time sources for the waveform
//!
//! [`SimulationClock`] follows the wall clock, so stepping the host clock
//! shifts the waveform. A backwards step below the start time reads as 0.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of whole seconds elapsed since the simulation started
pub trait Clock: Send {
    fn elapsed_secs(&self) -> u64;
}

/// Wall-clock time since process start
#[derive(Debug, Clone, Copy)]
pub struct SimulationClock {
    start_time: DateTime<Utc>,
}

impl SimulationClock {
    /// Capture the start time now
    pub fn start() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Whole seconds between the start time and `now`, clamped at 0
    pub fn elapsed_secs_at(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_time).num_seconds().max(0) as u64
    }
}

impl Clock for SimulationClock {
    fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs_at(Utc::now())
    }
}

/// Manually driven clock for tests and replays
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(elapsed_secs: u64) -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(elapsed_secs)),
        }
    }

    pub fn set(&self, elapsed_secs: u64) {
        self.elapsed.store(elapsed_secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.elapsed.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }
}
