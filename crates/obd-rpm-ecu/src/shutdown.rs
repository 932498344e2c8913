//! Graceful shutdown signals
//!
//! On Unix both SIGINT and SIGTERM are caught, so `kill`, `systemctl stop`
//! and `docker stop` stop the responder the same way Ctrl+C does. Handlers
//! are registered by [`ShutdownSignals::install`], before the first wait.

use std::io;

use tokio::signal;

/// Which signal asked the process to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

/// Registered shutdown signal handlers
pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: signal::unix::Signal,
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl ShutdownSignals {
    /// Register the handlers; from here on the signals no longer kill the process
    pub fn install() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use signal::unix::{signal, SignalKind};
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait for the next shutdown signal
    pub async fn recv(&mut self) -> io::Result<ShutdownReason> {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => Ok(ShutdownReason::Interrupt),
                _ = self.terminate.recv() => Ok(ShutdownReason::Terminate),
            }
        }
        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.map(|()| ShutdownReason::Interrupt)
        }
    }
}
