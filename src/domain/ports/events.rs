//! Provision Event Port
//!
//! Observable interface for plan, apply and destroy runs.
//! Drives terminal progress and NDJSON event streams.

use crate::domain::value_objects::ResourceKind;

/// Event emitted while provisioning a site
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionEvent {
    /// Dependency order computed
    PlanComputed {
        domain: String,
        order: Vec<ResourceKind>,
    },

    /// Work on a node started
    ResourceStarted { domain: String, kind: ResourceKind },

    /// Node created or changed
    ResourceApplied {
        domain: String,
        kind: ResourceKind,
        physical_id: String,
        created: bool,
    },

    /// Node already matched the desired configuration
    ResourceUnchanged {
        domain: String,
        kind: ResourceKind,
        physical_id: String,
    },

    ResourceFailed {
        domain: String,
        kind: ResourceKind,
        error: String,
        fatal: bool,
    },

    /// Node skipped because a dependency did not complete
    ResourceBlocked {
        domain: String,
        kind: ResourceKind,
        unmet: Vec<ResourceKind>,
    },

    /// Certificate still waiting on its DNS challenge
    CertificatePoll {
        domain: String,
        arn: String,
        attempt: u32,
        waited_secs: u64,
    },

    ObjectUploaded { domain: String, key: String },

    ObjectDeleted { domain: String, key: String },

    /// Bucket now mirrors the source folder
    ContentSynced {
        domain: String,
        uploaded: usize,
        deleted: usize,
        unchanged: usize,
    },

    InvalidationIssued {
        domain: String,
        distribution_id: String,
        invalidation_id: String,
    },

    ResourceDestroyed {
        domain: String,
        kind: ResourceKind,
        physical_id: String,
    },

    /// Run finished
    Completed {
        domain: String,
        applied: usize,
        unchanged: usize,
        failed: usize,
        blocked: usize,
    },
}

impl ProvisionEvent {
    /// Site the event belongs to
    pub fn domain(&self) -> &str {
        match self {
            Self::PlanComputed { domain, .. }
            | Self::ResourceStarted { domain, .. }
            | Self::ResourceApplied { domain, .. }
            | Self::ResourceUnchanged { domain, .. }
            | Self::ResourceFailed { domain, .. }
            | Self::ResourceBlocked { domain, .. }
            | Self::CertificatePoll { domain, .. }
            | Self::ObjectUploaded { domain, .. }
            | Self::ObjectDeleted { domain, .. }
            | Self::ContentSynced { domain, .. }
            | Self::InvalidationIssued { domain, .. }
            | Self::ResourceDestroyed { domain, .. }
            | Self::Completed { domain, .. } => domain,
        }
    }

    /// Per-object events are detail; everything else is summary
    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            Self::ObjectUploaded { .. } | Self::ObjectDeleted { .. } | Self::CertificatePoll { .. }
        )
    }
}

/// Trait for receiving provision events
///
/// Implementations:
/// - ConsoleEventSink: progress lines on the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: silent operation
pub trait ProvisionEventSink: Send + Sync {
    fn on_event(&self, event: ProvisionEvent);

    /// Whether per-object and per-poll events are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ProvisionEventSink for NoopEventSink {
    fn on_event(&self, _event: ProvisionEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<ProvisionEvent>>>,
    }

    impl ProvisionEventSink for RecordingEventSink {
        fn on_event(&self, event: ProvisionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_recording_sink_captures_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(ProvisionEvent::ResourceStarted {
            domain: "docs.example.com".to_string(),
            kind: ResourceKind::HostingBucket,
        });
        sink.on_event(ProvisionEvent::ObjectUploaded {
            domain: "docs.example.com".to_string(),
            key: "index.html".to_string(),
        });

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].domain(), "docs.example.com");
        assert!(recorded[1].is_detail());
        assert!(!recorded[0].is_detail());
    }

    #[test]
    fn test_noop_sink_wants_no_details() {
        assert!(!NoopEventSink.wants_detailed_events());
    }
}
