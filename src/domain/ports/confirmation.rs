//! Confirmation Port
//!
//! Asks the operator before destructive operations.

/// Trait for confirming teardown.
///
/// Implementations:
/// - `InteractiveConfirmer`: prompts on the terminal
/// - `AssumeYes`: always confirms (`--yes`)
pub trait Confirmer: Send + Sync {
    /// Return true to proceed with destroying `resources` of `domain`
    fn confirm_destroy(&self, domain: &str, resources: &[String]) -> bool;
}

/// Confirms everything
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm_destroy(&self, _domain: &str, _resources: &[String]) -> bool {
        true
    }
}
