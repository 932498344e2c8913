//! OBD-II Service 0x01 frame layout
//!
//! Single-frame requests and responses only. The first payload byte is the
//! ISO-TP single-frame length, followed by the service and PID.
//!
//! ```text
//! request  0x7DF  [len] [0x01] [0x0C] ...
//! response 0x7E8  [0x04] [0x41] [0x0C] [A] [B] [0x00] [0x00] [0x00]
//! ```

/// OBD-II constants
pub mod obd {
    /// Functional broadcast request ID (all emission-related ECUs)
    pub const FUNCTIONAL_REQUEST_ID: u16 = 0x7DF;
    /// Physical response ID of ECU #1 (engine)
    pub const ECU_RESPONSE_ID: u16 = 0x7E8;
    /// Service 0x01: show current data
    pub const SERVICE_CURRENT_DATA: u8 = 0x01;
    /// Positive responses echo the service with this bit set
    pub const POSITIVE_RESPONSE_OFFSET: u8 = 0x40;
    /// PID 0x0C: engine RPM
    pub const PID_ENGINE_RPM: u8 = 0x0C;
    /// Largest standard (11-bit) identifier
    pub const MAX_STANDARD_ID: u16 = 0x7FF;
}

/// Classic CAN payload size
pub const CAN_MAX_DLEN: usize = 8;

/// Additional bytes after the length byte in a PID 0x0C response:
/// service, PID, A, B
const RPM_RESPONSE_LEN: u8 = 4;

/// A classic CAN frame as seen by the responder
///
/// Bytes past `dlc` are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObdFrame {
    id: u32,
    extended: bool,
    remote: bool,
    dlc: u8,
    data: [u8; CAN_MAX_DLEN],
}

impl ObdFrame {
    /// Standard-ID data frame. Returns `None` if the ID is not 11-bit or the
    /// payload is longer than 8 bytes.
    pub fn new(id: u16, payload: &[u8]) -> Option<Self> {
        if id > obd::MAX_STANDARD_ID {
            return None;
        }
        Self::from_raw(id as u32, false, false, payload)
    }

    /// Frame built from fields read off the bus
    pub fn from_raw(id: u32, extended: bool, remote: bool, payload: &[u8]) -> Option<Self> {
        if payload.len() > CAN_MAX_DLEN {
            return None;
        }
        let mut data = [0u8; CAN_MAX_DLEN];
        data[..payload.len()].copy_from_slice(payload);
        Some(Self {
            id,
            extended,
            remote,
            dlc: payload.len() as u8,
            data,
        })
    }

    /// Remote frame carrying only a requested length
    pub fn remote(id: u32, extended: bool, dlc: u8) -> Self {
        Self {
            id,
            extended,
            remote: true,
            dlc: dlc.min(CAN_MAX_DLEN as u8),
            data: [0; CAN_MAX_DLEN],
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// Payload bytes covered by the DLC; empty for remote frames
    pub fn payload(&self) -> &[u8] {
        if self.remote {
            return &[];
        }
        &self.data[..self.dlc as usize]
    }

    /// Payload byte at `index`, if the DLC covers it
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.payload().get(index).copied()
    }

    /// Service byte of a single-frame OBD request
    pub fn service(&self) -> Option<u8> {
        self.byte(1)
    }

    /// PID byte of a single-frame OBD request
    pub fn pid(&self) -> Option<u8> {
        self.byte(2)
    }
}

/// Build the PID 0x0C response frame for `pid_value` on `response_id`.
///
/// Only the low 16 bits of `pid_value` are encoded.
pub fn encode_response_on(response_id: u16, pid_value: u32) -> ObdFrame {
    let [hi, lo] = ((pid_value & 0xFFFF) as u16).to_be_bytes();
    let data = [
        RPM_RESPONSE_LEN,
        obd::SERVICE_CURRENT_DATA + obd::POSITIVE_RESPONSE_OFFSET,
        obd::PID_ENGINE_RPM,
        hi,
        lo,
        0x00,
        0x00,
        0x00,
    ];
    ObdFrame {
        id: (response_id & obd::MAX_STANDARD_ID) as u32,
        extended: false,
        remote: false,
        dlc: CAN_MAX_DLEN as u8,
        data,
    }
}

/// Build the PID 0x0C response frame on the default ECU response ID
pub fn encode_response(pid_value: u32) -> ObdFrame {
    encode_response_on(obd::ECU_RESPONSE_ID, pid_value)
}

/// Value carried in bytes A/B of a PID 0x0C response
pub fn decode_response_value(frame: &ObdFrame) -> Option<u16> {
    match frame.payload() {
        [_, service, pid, hi, lo, ..]
            if *service == obd::SERVICE_CURRENT_DATA + obd::POSITIVE_RESPONSE_OFFSET
                && *pid == obd::PID_ENGINE_RPM =>
        {
            Some(u16::from_be_bytes([*hi, *lo]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn response_layout() {
        let frame = encode_response(4000);
        assert_eq!(frame.id(), 0x7E8);
        assert_eq!(frame.dlc(), 8);
        assert!(!frame.is_extended());
        assert_eq!(
            frame.payload(),
            &[0x04, 0x41, 0x0C, 0x0F, 0xA0, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn response_value_is_big_endian() {
        for value in 0..=u16::MAX {
            let frame = encode_response(value as u32);
            assert_eq!(decode_response_value(&frame), Some(value));
            assert_eq!(frame.byte(3), Some((value >> 8) as u8));
            assert_eq!(frame.byte(4), Some(value as u8));
            assert_eq!(&frame.payload()[5..], &[0u8, 0, 0]);
        }
    }

    #[test]
    fn response_masks_to_16_bits() {
        let frame = encode_response(0x1_2345);
        assert_eq!(frame.byte(3), Some(0x23));
        assert_eq!(frame.byte(4), Some(0x45));
    }

    #[test]
    fn custom_response_id() {
        let frame = encode_response_on(0x7E9, 6000);
        assert_eq!(frame.id(), 0x7E9);
        assert_eq!(decode_response_value(&frame), Some(6000));
    }

    #[test]
    fn short_frame_accessors() {
        let frame = ObdFrame::new(0x7DF, &[0x02, 0x01]).unwrap();
        assert_eq!(frame.dlc(), 2);
        assert_eq!(frame.service(), Some(0x01));
        assert_eq!(frame.pid(), None);
    }

    #[test]
    fn rejects_invalid_frames() {
        assert!(ObdFrame::new(0x800, &[0x02, 0x01, 0x0C]).is_none());
        assert!(ObdFrame::new(0x7DF, &[0u8; 9]).is_none());
    }

    #[test]
    fn remote_frame_has_no_payload_bytes() {
        let frame = ObdFrame::remote(0x7DF, false, 3);
        assert!(frame.is_remote());
        assert_eq!(frame.dlc(), 3);
        assert!(frame.payload().is_empty());
        assert_eq!(frame.service(), None);
        assert_eq!(frame.pid(), None);
    }

    #[test]
    fn decode_ignores_other_frames() {
        let request = ObdFrame::new(0x7DF, &[0x02, 0x01, 0x0C]).unwrap();
        assert_eq!(decode_response_value(&request), None);
    }
}
