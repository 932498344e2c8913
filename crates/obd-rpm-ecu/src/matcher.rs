//! Recognize engine RPM requests among bus traffic
//!
//! The bus is shared with other ECUs and testers, so anything that is not a
//! Service 0x01 / PID 0x0C request on the request ID is simply not for us.

use crate::frame::{obd, ObdFrame};

/// Minimum DLC of a request: length, service, PID
const MIN_REQUEST_DLC: u8 = 3;

/// Whether `frame` asks for engine RPM on `request_id`
pub fn is_rpm_request_on(frame: &ObdFrame, request_id: u16) -> bool {
    !frame.is_extended()
        && !frame.is_remote()
        && frame.id() == request_id as u32
        && frame.dlc() >= MIN_REQUEST_DLC
        && frame.service() == Some(obd::SERVICE_CURRENT_DATA)
        && frame.pid() == Some(obd::PID_ENGINE_RPM)
}

/// Whether `frame` asks for engine RPM on the functional broadcast ID
pub fn is_rpm_request(frame: &ObdFrame) -> bool {
    is_rpm_request_on(frame, obd::FUNCTIONAL_REQUEST_ID)
}
