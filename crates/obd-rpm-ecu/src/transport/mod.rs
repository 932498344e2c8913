//! Frame-level bus access
//!
//! - SocketCAN raw socket (Linux only)
//! - Mock bus for testing
//!
//! # Example
//!
//! ```ignore
//! use obd_rpm_ecu::config::TransportConfig;
//! use obd_rpm_ecu::transport::open_bus;
//!
//! let mut bus = open_bus(&TransportConfig::default())?;
//! let frame = bus.read_frame()?;
//! ```

pub mod error;
pub mod mock;

#[cfg(all(target_os = "linux", feature = "socketcan"))]
pub mod socketcan;

pub use error::TransportError;
pub use mock::MockBus;

use crate::config::TransportConfig;
use crate::frame::ObdFrame;

/// Blocking, one-frame-at-a-time access to a CAN bus
pub trait FrameBus: Send {
    /// Block until a frame arrives or the read timeout expires
    fn read_frame(&mut self) -> Result<ObdFrame, TransportError>;

    /// Transmit a single frame
    fn write_frame(&mut self, frame: &ObdFrame) -> Result<(), TransportError>;
}

impl<B: FrameBus + ?Sized> FrameBus for Box<B> {
    fn read_frame(&mut self) -> Result<ObdFrame, TransportError> {
        (**self).read_frame()
    }

    fn write_frame(&mut self, frame: &ObdFrame) -> Result<(), TransportError> {
        (**self).write_frame(frame)
    }
}

/// Open the bus described by `config`
pub fn open_bus(config: &TransportConfig) -> Result<Box<dyn FrameBus>, TransportError> {
    #[cfg(all(target_os = "linux", feature = "socketcan"))]
    {
        let bus = socketcan::SocketCanBus::open(config)?;
        Ok(Box::new(bus))
    }
    #[cfg(not(all(target_os = "linux", feature = "socketcan")))]
    {
        Err(TransportError::Unsupported(format!(
            "cannot open {}: SocketCAN requires Linux and the 'socketcan' feature",
            config.interface
        )))
    }
}
