//! Raw SocketCAN bus

use std::io;
use std::time::Duration;

use socketcan::{CanFrame, CanSocket, EmbeddedFrame, Frame, Socket, StandardId};

use crate::config::TransportConfig;
use crate::frame::ObdFrame;
use crate::transport::{FrameBus, TransportError};

/// Raw CAN socket bound to one interface
pub struct SocketCanBus {
    interface: String,
    socket: CanSocket,
}

impl SocketCanBus {
    /// Open a raw socket and bind it to `config.interface`
    pub fn open(config: &TransportConfig) -> Result<Self, TransportError> {
        let socket = CanSocket::open(&config.interface).map_err(|e| {
            TransportError::ConnectionFailed(format!(
                "Failed to open raw CAN socket on {}: {}",
                config.interface, e
            ))
        })?;

        socket
            .set_read_timeout(Duration::from_millis(config.read_timeout_ms))
            .map_err(|e| {
                TransportError::InvalidConfig(format!("Failed to set read timeout: {}", e))
            })?;

        tracing::info!(interface = %config.interface, "Raw CAN socket bound");

        Ok(Self {
            interface: config.interface.clone(),
            socket,
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl FrameBus for SocketCanBus {
    fn read_frame(&mut self) -> Result<ObdFrame, TransportError> {
        match self.socket.read_frame() {
            Ok(frame) => from_can_frame(&frame),
            Err(e) => Err(classify_read_error(&self.interface, e)),
        }
    }

    fn write_frame(&mut self, frame: &ObdFrame) -> Result<(), TransportError> {
        let can_frame = to_can_frame(frame)?;
        self.socket
            .write_frame(&can_frame)
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}

fn classify_read_error(interface: &str, e: io::Error) -> TransportError {
    if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) {
        return TransportError::Timeout;
    }
    match e.raw_os_error() {
        Some(libc::ENETDOWN) | Some(libc::ENODEV) | Some(libc::ENXIO) => {
            TransportError::InterfaceDown(format!("{}: {}", interface, e))
        }
        _ => TransportError::ReceiveFailed(e.to_string()),
    }
}

fn from_can_frame(frame: &CanFrame) -> Result<ObdFrame, TransportError> {
    match frame {
        CanFrame::Data(data) => {
            ObdFrame::from_raw(
                data.raw_id(),
                EmbeddedFrame::is_extended(data),
                false,
                EmbeddedFrame::data(data),
            )
            .ok_or_else(|| {
                TransportError::ReceiveFailed(format!("Oversized frame 0x{:X}", data.raw_id()))
            })
        }
        CanFrame::Remote(remote) => Ok(ObdFrame::remote(
            remote.raw_id(),
            EmbeddedFrame::is_extended(remote),
            EmbeddedFrame::dlc(remote) as u8,
        )),
        CanFrame::Error(_) => Err(TransportError::ReceiveFailed(
            "Error frame received".to_string(),
        )),
    }
}

fn to_can_frame(frame: &ObdFrame) -> Result<CanFrame, TransportError> {
    let id = u16::try_from(frame.id())
        .ok()
        .and_then(StandardId::new)
        .ok_or_else(|| {
            TransportError::SendFailed(format!("Invalid standard CAN ID: 0x{:X}", frame.id()))
        })?;
    CanFrame::new(id, frame.payload())
        .ok_or_else(|| TransportError::SendFailed("Invalid CAN frame".to_string()))
}
