//! Passphrase generation boundary
//!
//! The companion mobile app calls one synchronous function that turns an
//! input into a passphrase. Implementations may allocate the result outside
//! Rust ownership; [`BufferedPassphraseBridge`] adapts those through
//! [`OwnedBuffer`].

use std::sync::Arc;

use super::{offload, BridgeError, OwnedBuffer, Pending};

/// `generate_passphrase(input) -> string`
pub trait PassphraseBridge: Send + Sync {
    fn generate_passphrase(&self, input: &str) -> Result<String, BridgeError>;
}

/// Bridge over a generator that returns a buffer with a release obligation
pub struct BufferedPassphraseBridge<F> {
    generate: F,
}

impl<F> BufferedPassphraseBridge<F>
where
    F: Fn(&str) -> Option<OwnedBuffer<String>> + Send + Sync,
{
    pub fn new(generate: F) -> Self {
        Self { generate }
    }
}

impl<F> PassphraseBridge for BufferedPassphraseBridge<F>
where
    F: Fn(&str) -> Option<OwnedBuffer<String>> + Send + Sync,
{
    fn generate_passphrase(&self, input: &str) -> Result<String, BridgeError> {
        let buffer = (self.generate)(input)
            .ok_or_else(|| BridgeError::Call(format!("no passphrase for input '{}'", input)))?;
        buffer
            .into_inner()
            .ok_or_else(|| BridgeError::Call("passphrase buffer was already released".to_string()))
    }
}

/// Calls a bridge off the caller's thread
pub struct PassphraseClient {
    bridge: Arc<dyn PassphraseBridge>,
}

impl PassphraseClient {
    pub fn new(bridge: Arc<dyn PassphraseBridge>) -> Self {
        Self { bridge }
    }

    pub fn request(&self, input: &str) -> Pending<Result<String, BridgeError>> {
        let bridge = self.bridge.clone();
        let input = input.to_string();
        offload(move || bridge.generate_passphrase(&input))
    }

    /// Blocking convenience over [`PassphraseClient::request`]
    pub fn generate(&self, input: &str) -> Result<String, BridgeError> {
        self.request(input).wait()?
    }
}
