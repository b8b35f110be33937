//! JSON Event Sink
//!
//! Outputs provision events as NDJSON for CI/automation consumption.

use crate::domain::ports::{ProvisionEvent, ProvisionEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events
pub struct JsonEventSink {
    /// Serializes writes from concurrent site pipelines
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn to_json(event: ProvisionEvent) -> serde_json::Value {
    match event {
        ProvisionEvent::PlanComputed { domain, order } => serde_json::json!({
            "event": "plan",
            "domain": domain,
            "order": order,
        }),

        ProvisionEvent::ResourceStarted { domain, kind } => serde_json::json!({
            "event": "resource_start",
            "domain": domain,
            "resource": kind,
        }),

        ProvisionEvent::ResourceApplied {
            domain,
            kind,
            physical_id,
            created,
        } => serde_json::json!({
            "event": "resource_applied",
            "domain": domain,
            "resource": kind,
            "physical_id": physical_id,
            "action": if created { "created" } else { "updated" },
        }),

        ProvisionEvent::ResourceUnchanged {
            domain,
            kind,
            physical_id,
        } => serde_json::json!({
            "event": "resource_unchanged",
            "domain": domain,
            "resource": kind,
            "physical_id": physical_id,
        }),

        ProvisionEvent::ResourceFailed {
            domain,
            kind,
            error,
            fatal,
        } => serde_json::json!({
            "event": "resource_failed",
            "domain": domain,
            "resource": kind,
            "error": error,
            "fatal": fatal,
        }),

        ProvisionEvent::ResourceBlocked {
            domain,
            kind,
            unmet,
        } => serde_json::json!({
            "event": "resource_blocked",
            "domain": domain,
            "resource": kind,
            "unmet": unmet,
        }),

        ProvisionEvent::CertificatePoll {
            domain,
            arn,
            attempt,
            waited_secs,
        } => serde_json::json!({
            "event": "certificate_poll",
            "domain": domain,
            "arn": arn,
            "attempt": attempt,
            "waited_secs": waited_secs,
        }),

        ProvisionEvent::ObjectUploaded { domain, key } => serde_json::json!({
            "event": "object_uploaded",
            "domain": domain,
            "key": key,
        }),

        ProvisionEvent::ObjectDeleted { domain, key } => serde_json::json!({
            "event": "object_deleted",
            "domain": domain,
            "key": key,
        }),

        ProvisionEvent::ContentSynced {
            domain,
            uploaded,
            deleted,
            unchanged,
        } => serde_json::json!({
            "event": "content_synced",
            "domain": domain,
            "uploaded": uploaded,
            "deleted": deleted,
            "unchanged": unchanged,
        }),

        ProvisionEvent::InvalidationIssued {
            domain,
            distribution_id,
            invalidation_id,
        } => serde_json::json!({
            "event": "invalidation_issued",
            "domain": domain,
            "distribution_id": distribution_id,
            "invalidation_id": invalidation_id,
        }),

        ProvisionEvent::ResourceDestroyed {
            domain,
            kind,
            physical_id,
        } => serde_json::json!({
            "event": "resource_destroyed",
            "domain": domain,
            "resource": kind,
            "physical_id": physical_id,
        }),

        ProvisionEvent::Completed {
            domain,
            applied,
            unchanged,
            failed,
            blocked,
        } => {
            let status = if failed == 0 && blocked == 0 {
                "success"
            } else {
                "partial"
            };
            serde_json::json!({
                "event": "complete",
                "domain": domain,
                "status": status,
                "applied": applied,
                "unchanged": unchanged,
                "failed": failed,
                "blocked": blocked,
            })
        }
    }
}

impl ProvisionEventSink for JsonEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        self.write_event(to_json(event));
    }
}
