//! Request counters reported on shutdown

use tracing::info;

/// Counts of handled frames and the range of values sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStats {
    /// RPM requests answered (whether or not the send succeeded)
    pub answered: u64,
    /// Frames that were not RPM requests
    pub ignored: u64,
    /// Replies the bus failed to send
    pub send_failures: u64,
    /// Smallest and largest value put in a response
    pub value_range: Option<(u32, u32)>,
}

impl RequestStats {
    pub fn record_answer(&mut self, value: u32) {
        self.answered += 1;
        self.value_range = Some(match self.value_range {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }

    pub fn record_ignored(&mut self) {
        self.ignored += 1;
    }

    pub fn record_send_failure(&mut self) {
        self.send_failures += 1;
    }

    /// Log a one-line summary
    pub fn log_summary(&self) {
        match self.value_range {
            Some((min, max)) => info!(
                requests = self.answered,
                ignored = self.ignored,
                send_failures = self.send_failures,
                min_rpm = min,
                max_rpm = max,
                "PID 0x0C request summary"
            ),
            None => info!(
                requests = 0,
                ignored = self.ignored,
                "PID 0x0C request summary: no requests answered"
            ),
        }
    }
}
