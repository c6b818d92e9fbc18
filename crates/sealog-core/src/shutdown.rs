//! Signal-triggered durable shutdown.
//!
//! [`ShutdownCoordinator::run`] waits for a trigger (normally
//! [`TerminationSignals::recv`]), takes the writer lock, flushes and syncs
//! the output file, then tells every [`ShutdownSignal`] holder to stop.
//! The ingest loop checks its `ShutdownSignal` between lines.

use std::future::Future;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::SharedWriter;

/// Runs the final flush once a termination trigger fires.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    writer: SharedWriter,
    notify: watch::Sender<bool>,
}

/// Receiving side of a shutdown notification.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownCoordinator {
    /// Create a coordinator for `writer` and the signal the producer watches.
    pub fn new(writer: SharedWriter) -> (Self, ShutdownSignal) {
        let (notify, rx) = watch::channel(false);
        (Self { writer, notify }, ShutdownSignal { rx })
    }

    /// Wait for `trigger`, then flush, sync, and close the writer.
    ///
    /// Consumes the coordinator, so the close path runs at most once.
    /// Returns `Ok(true)` if this call closed the writer, `Ok(false)` if the
    /// producer had already closed it at end of input.
    pub async fn run<F>(self, trigger: F) -> Result<bool>
    where
        F: Future,
    {
        trigger.await;
        info!("Termination requested, flushing output");

        let closed = self.writer.close_blocking().await;

        self.notify.send_replace(true);

        match &closed {
            Ok(true) => info!("Output flushed and synced"),
            Ok(false) => info!("Output was already closed"),
            Err(e) => warn!("Shutdown flush failed: {}", e),
        }
        closed
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown has completed its flush.
    ///
    /// Never resolves if the coordinator is dropped without running.
    pub async fn requested(&mut self) {
        let sender_gone = self.rx.wait_for(|done| *done).await.is_err();
        if sender_gone {
            std::future::pending::<()>().await;
        }
    }

    /// Non-blocking check.
    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }
}

/// OS termination signals, registered up front.
///
/// SIGINT and SIGTERM on Unix; Ctrl-C elsewhere.
#[derive(Debug)]
pub struct TerminationSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl TerminationSignals {
    /// Install the handlers. Must be called inside a Tokio runtime and
    /// before input is read, so a signal never hits the default handler.
    #[cfg(unix)]
    pub fn register() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Install the handlers.
    #[cfg(not(unix))]
    pub fn register() -> Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next termination signal and return its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    /// Wait for the next termination signal and return its name.
    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        "Ctrl-C"
    }
}
