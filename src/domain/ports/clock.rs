//! Clock port - time source for polling loops

use std::time::Duration;

use crate::domain::value_objects::CancelToken;

/// Sleep was interrupted by cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Monotonic time source with cancellable sleep
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock was created
    fn elapsed(&self) -> Duration;

    /// Sleep for `duration`, returning early if `cancel` fires
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> Result<(), Interrupted>;
}
