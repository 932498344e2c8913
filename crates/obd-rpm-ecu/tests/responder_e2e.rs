//! End-to-end tests for the RPM responder
//!
//! Frames are injected through the mock bus and the responder loop runs
//! until the script is drained. No CAN interface is needed.

use std::sync::atomic::Ordering;
use std::time::Duration;

use obd_rpm_ecu::config::ObdConfig;
use obd_rpm_ecu::frame::decode_response_value;
use obd_rpm_ecu::transport::MockBus;
use obd_rpm_ecu::{rpm_for, ManualClock, ObdFrame, RpmResponder, TransportError};
use pretty_assertions::assert_eq;

fn rpm_request() -> ObdFrame {
    ObdFrame::new(0x7DF, &[0x02, 0x01, 0x0C]).unwrap()
}

/// Run the responder over everything queued on `bus`
fn run_to_completion(bus: &MockBus, clock: ManualClock) -> obd_rpm_ecu::stats::RequestStats {
    let responder = RpmResponder::new(bus.clone(), clock, ObdConfig::default());
    bus.stop_when_drained(responder.running_flag());
    responder.run()
}

#[test]
fn request_at_start_returns_4000() {
    let bus = MockBus::new();
    bus.inject(rpm_request());

    run_to_completion(&bus, ManualClock::new(0));

    let sent = bus.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id(), 0x7E8);
    assert_eq!(sent[0].dlc(), 8);
    assert_eq!(
        sent[0].payload(),
        &[0x04, 0x41, 0x0C, 0x0F, 0xA0, 0x00, 0x00, 0x00]
    );
}

#[test]
fn request_mid_cycle_returns_9000() {
    let bus = MockBus::new();
    bus.inject(rpm_request());

    run_to_completion(&bus, ManualClock::new(45));

    assert_eq!(
        bus.sent()[0].payload(),
        &[0x04, 0x41, 0x0C, 0x23, 0x28, 0x00, 0x00, 0x00]
    );
}

#[test]
fn irrelevant_frame_gets_no_response() {
    let bus = MockBus::new();
    bus.inject(ObdFrame::new(0x123, &[0x02, 0x01, 0x0C, 0, 0, 0, 0, 0]).unwrap());

    let stats = run_to_completion(&bus, ManualClock::new(0));

    assert!(bus.sent().is_empty());
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.answered, 0);
}

#[test]
fn mixed_traffic_only_answers_rpm_requests() {
    let bus = MockBus::new();
    bus.inject(ObdFrame::new(0x7DF, &[0x02, 0x01, 0x0D]).unwrap()); // vehicle speed
    bus.inject(rpm_request());
    bus.inject(ObdFrame::new(0x7DF, &[0x02, 0x09, 0x02]).unwrap()); // VIN
    bus.inject(ObdFrame::new(0x7DF, &[0x02, 0x01]).unwrap()); // short
    bus.inject_error(TransportError::ReceiveFailed("Interrupted system call".to_string()));
    bus.inject(ObdFrame::new(0x7E0, &[0x02, 0x01, 0x0C]).unwrap()); // physical
    bus.inject(rpm_request());

    let stats = run_to_completion(&bus, ManualClock::new(89));

    let sent = bus.sent();
    assert_eq!(sent.len(), 2);
    for frame in &sent {
        assert_eq!(decode_response_value(frame), Some(19830));
    }
    assert_eq!(stats.answered, 2);
    assert_eq!(stats.ignored, 4);
    assert_eq!(stats.value_range, Some((19830, 19830)));
}

#[test]
fn responses_track_waveform_over_a_cycle() {
    let clock = ManualClock::new(0);
    let bus = MockBus::new();
    let mut responder = RpmResponder::new(bus.clone(), clock.clone(), ObdConfig::default());

    for elapsed in 0..180u64 {
        clock.set(elapsed);
        bus.inject(rpm_request());
        assert!(responder.poll_once().is_some());
    }

    let values: Vec<u16> = bus
        .sent()
        .iter()
        .map(|frame| decode_response_value(frame).unwrap())
        .collect();
    assert_eq!(values.len(), 180);
    for (elapsed, value) in values.iter().enumerate() {
        assert_eq!(*value as u32, rpm_for(elapsed as u64));
    }
    assert_eq!(responder.stats().value_range, Some((4000, 19830)));
}

#[test]
fn send_failures_do_not_stop_the_loop() {
    let bus = MockBus::new();
    bus.set_fail_writes(true);
    bus.inject(rpm_request());
    bus.inject(rpm_request());

    let stats = run_to_completion(&bus, ManualClock::new(30));

    assert!(bus.sent().is_empty());
    assert_eq!(stats.answered, 2);
    assert_eq!(stats.send_failures, 2);
    assert_eq!(bus.pending(), 0);
}

#[tokio::test]
async fn shutdown_flag_stops_blocking_worker() {
    let bus = MockBus::new();
    let responder = RpmResponder::new(bus.clone(), ManualClock::new(0), ObdConfig::default());
    let running = responder.running_flag();

    let worker = tokio::task::spawn_blocking(move || responder.run());

    bus.inject(rpm_request());
    tokio::time::timeout(Duration::from_secs(2), async {
        while bus.sent().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("responder never answered");

    running.store(false, Ordering::SeqCst);
    let stats = tokio::time::timeout(Duration::from_secs(2), worker)
        .await
        .expect("responder did not stop")
        .unwrap();

    assert_eq!(stats.answered, 1);
}
