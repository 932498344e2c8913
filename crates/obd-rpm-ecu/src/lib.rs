//! obd-rpm-ecu - OBD-II Engine RPM Responder
//!
//! Emulates an engine ECU that answers OBD-II Service 0x01 / PID 0x0C
//! requests on a CAN bus with a synthetic, time-varying RPM value.
//!
//! # Modules
//!
//! - [`waveform`] - RPM value as a function of elapsed time
//! - [`frame`] - OBD-II request/response frame layout
//! - [`matcher`] - Engine RPM request recognition
//! - [`clock`] - Elapsed-time sources
//! - [`responder`] - Receive/respond loop
//! - [`shutdown`] - SIGINT/SIGTERM handling
//! - [`transport`] - SocketCAN and mock buses
//! - [`config`] - Interface and CAN ID configuration
//! - [`stats`] - Request counters

pub mod clock;
pub mod config;
pub mod frame;
pub mod matcher;
pub mod responder;
pub mod shutdown;
pub mod stats;
pub mod transport;
pub mod waveform;

pub use clock::{Clock, ManualClock, SimulationClock};
pub use config::{ConfigError, EcuConfig};
pub use frame::{encode_response, ObdFrame};
pub use matcher::is_rpm_request;
pub use responder::RpmResponder;
pub use transport::{FrameBus, TransportError};
pub use waveform::rpm_for;
