//! Receive/respond loop
//!
//! One thread owns the bus and handles each frame end to end:
//! receive, match, compute, encode, send. Receive errors never end the
//! loop and send failures are only logged. The loop stops when the shared
//! `running` flag is cleared, checked after every receive attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::clock::Clock;
use crate::config::ObdConfig;
use crate::frame::{encode_response_on, ObdFrame};
use crate::matcher::is_rpm_request_on;
use crate::stats::RequestStats;
use crate::transport::{FrameBus, TransportError};
use crate::waveform::rpm_for;

/// Engine RPM responder bound to a bus and a clock
pub struct RpmResponder<B, C> {
    bus: B,
    clock: C,
    obd: ObdConfig,
    stats: RequestStats,
    running: Arc<AtomicBool>,
}

impl<B: FrameBus, C: Clock> RpmResponder<B, C> {
    pub fn new(bus: B, clock: C, obd: ObdConfig) -> Self {
        Self {
            bus,
            clock,
            obd,
            stats: RequestStats::default(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag that keeps [`run`](Self::run) going; store `false` to stop it
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    /// Reply for `frame`, if it is an RPM request
    pub fn handle_frame(&mut self, frame: &ObdFrame) -> Option<ObdFrame> {
        if !is_rpm_request_on(frame, self.obd.request_id) {
            trace!(can_id = format!("0x{:03X}", frame.id()), "Ignoring frame");
            self.stats.record_ignored();
            return None;
        }

        let elapsed_secs = self.clock.elapsed_secs();
        let rpm = rpm_for(elapsed_secs);
        debug!(elapsed_secs, rpm, "Answering engine RPM request");

        self.stats.record_answer(rpm);
        Some(encode_response_on(self.obd.response_id, rpm))
    }

    /// Receive one frame and answer it if needed
    ///
    /// Returns the reply that was attempted, if any.
    pub fn poll_once(&mut self) -> Option<ObdFrame> {
        let frame = match self.bus.read_frame() {
            Ok(frame) => frame,
            Err(TransportError::Timeout) => return None,
            Err(e) if e.is_transient() => {
                debug!(error = %e, "Receive error, skipping");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Receive error");
                return None;
            }
        };

        let reply = self.handle_frame(&frame)?;
        if let Err(e) = self.bus.write_frame(&reply) {
            warn!(error = %e, "Failed to send RPM response");
            self.stats.record_send_failure();
        }
        Some(reply)
    }

    /// Serve requests until the running flag is cleared
    pub fn run(mut self) -> RequestStats {
        info!(
            request_id = format!("0x{:03X}", self.obd.request_id),
            response_id = format!("0x{:03X}", self.obd.response_id),
            "RPM responder running"
        );

        while self.running.load(Ordering::SeqCst) {
            self.poll_once();
        }

        info!("RPM responder stopped");
        self.stats
    }
}
