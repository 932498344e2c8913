//! Mock bus for testing
//!
//! Inbound frames are scripted up front; everything the responder transmits
//! is recorded. Clones share state, so a test can keep a handle after moving
//! the bus into a responder.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{FrameBus, TransportError};
use crate::frame::ObdFrame;

#[derive(Default)]
struct MockState {
    inbound: VecDeque<Result<ObdFrame, TransportError>>,
    sent: Vec<ObdFrame>,
    fail_writes: bool,
    stop_when_drained: Option<Arc<AtomicBool>>,
}

/// In-memory bus with scripted receives
#[derive(Clone, Default)]
pub struct MockBus {
    state: Arc<Mutex<MockState>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame to be received
    pub fn inject(&self, frame: ObdFrame) {
        self.state.lock().inbound.push_back(Ok(frame));
    }

    /// Queue a receive error
    pub fn inject_error(&self, error: TransportError) {
        self.state.lock().inbound.push_back(Err(error));
    }

    /// Make every transmit fail (frames are not recorded)
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Clear `running` once all queued frames have been read
    pub fn stop_when_drained(&self, running: Arc<AtomicBool>) {
        self.state.lock().stop_when_drained = Some(running);
    }

    /// Frames transmitted so far
    pub fn sent(&self) -> Vec<ObdFrame> {
        self.state.lock().sent.clone()
    }

    /// Number of queued frames not yet read
    pub fn pending(&self) -> usize {
        self.state.lock().inbound.len()
    }
}

impl FrameBus for MockBus {
    fn read_frame(&mut self) -> Result<ObdFrame, TransportError> {
        let mut state = self.state.lock();
        match state.inbound.pop_front() {
            Some(next) => next,
            None => {
                if let Some(running) = &state.stop_when_drained {
                    running.store(false, Ordering::SeqCst);
                }
                drop(state);
                // Pace idle polling like a real read timeout would
                std::thread::sleep(std::time::Duration::from_millis(1));
                Err(TransportError::Timeout)
            }
        }
    }

    fn write_frame(&mut self, frame: &ObdFrame) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(TransportError::SendFailed("mock write failure".to_string()));
        }
        state.sent.push(*frame);
        Ok(())
    }
}
