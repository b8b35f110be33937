//! Blocking call bridge
//!
//! Runs blocking work on a dedicated worker thread and hands the result back
//! exactly once through a [`Pending`] handle. Out-of-band allocations that
//! cross the boundary travel inside an [`OwnedBuffer`], which releases them
//! exactly once, including when the receiver gives up early.

mod buffer;
mod passphrase;

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use thiserror::Error;

pub use buffer::OwnedBuffer;
pub use passphrase::{BufferedPassphraseBridge, PassphraseBridge, PassphraseClient};

/// Bridge failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("worker thread exited without delivering a result")]
    Disconnected,

    #[error("no result within {0:?}")]
    TimedOut(Duration),

    #[error("{0}")]
    Call(String),
}

/// Result of offloaded work, delivered once
pub struct Pending<T> {
    receiver: Receiver<Result<T, BridgeError>>,
}

impl<T> Pending<T> {
    /// Block until the worker delivers
    pub fn wait(self) -> Result<T, BridgeError> {
        self.receiver
            .recv()
            .unwrap_or(Err(BridgeError::Disconnected))
    }

    /// Wait at most `timeout`; the handle stays usable on timeout
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T, BridgeError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(delivered) => delivered,
            Err(RecvTimeoutError::Timeout) => Err(BridgeError::TimedOut(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(BridgeError::Disconnected),
        }
    }

    /// Take the result if it already arrived
    pub fn try_take(&self) -> Option<Result<T, BridgeError>> {
        match self.receiver.try_recv() {
            Ok(delivered) => Some(delivered),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(BridgeError::Disconnected)),
        }
    }
}

/// Run `work` on a dedicated thread
///
/// Dropping the returned handle does not stop the work; its result is
/// dropped on the worker side.
pub fn offload<T, F>(work: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = mpsc::sync_channel(1);
    thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            BridgeError::WorkerPanicked(message)
        });
        let _ = sender.send(outcome);
    });
    Pending { receiver }
}
