//! OBD-II Engine RPM Responder
//!
//! Answers Service 0x01 / PID 0x0C requests on a CAN interface with a
//! repeating low/medium/high RPM pattern.
//!
//! # Usage
//!
//! Stock responder on can0:
//! ```bash
//! ./obd-rpm-ecu
//! ```
//!
//! Virtual interface for testing:
//! ```bash
//! ./obd-rpm-ecu --interface vcan0 --verbose
//! ```

use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use obd_rpm_ecu::shutdown::ShutdownSignals;
use obd_rpm_ecu::transport::open_bus;
use obd_rpm_ecu::{EcuConfig, RpmResponder, SimulationClock};

#[derive(Parser, Debug)]
#[command(name = "obd-rpm-ecu")]
#[command(about = "OBD-II engine RPM responder for CAN bus testing")]
struct Args {
    /// Configuration file path (TOML, or YAML for .yaml/.yml)
    #[arg(short, long)]
    config: Option<String>,

    /// CAN interface name (overrides the config file)
    #[arg(short, long)]
    interface: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "obd_rpm_ecu=debug"
    } else {
        "obd_rpm_ecu=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path);
            EcuConfig::load(path).context("Failed to load config")?
        }
        None => EcuConfig::default(),
    };
    if let Some(interface) = args.interface {
        config.transport.interface = interface;
    }
    config.validate()?;

    info!("Starting OBD-II RPM responder");
    info!(
        interface = %config.transport.interface,
        request_id = format!("0x{:03X}", config.obd.request_id),
        response_id = format!("0x{:03X}", config.obd.response_id)
    );

    let bus = open_bus(&config.transport)
        .with_context(|| format!("Failed to bind to {}", config.transport.interface))?;

    let mut signals = ShutdownSignals::install().context("Failed to install signal handlers")?;

    let clock = SimulationClock::start();
    info!(start_time = %clock.start_time(), "Simulation clock started");

    let responder = RpmResponder::new(bus, clock, config.obd);
    let running = responder.running_flag();
    let worker = tokio::task::spawn_blocking(move || responder.run());

    info!("Press Ctrl+C to stop");
    let reason = signals.recv().await?;
    info!(?reason, "Shutting down...");

    running.store(false, Ordering::SeqCst);
    let stats = worker.await.context("Responder thread panicked")?;
    stats.log_summary();

    Ok(())
}
