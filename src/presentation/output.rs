//! Output Rendering
//!
//! Renders plans, apply reports, teardown reports and recorded state as
//! text or JSON. Rendering returns strings; the binary decides where they go.

use crate::application::{ApplyReport, DestroyReport, Plan, ResourceOutcome, SiteRun};
use crate::domain::entities::{CompletionStatus, SiteState};
use crate::domain::value_objects::ResourceKind;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

struct Icons {
    check: &'static str,
    cross: &'static str,
    arrow: &'static str,
    skip: &'static str,
    warn: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            arrow: "→",
            skip: "○",
            warn: "⚠",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            arrow: "->",
            skip: "[ ]",
            warn: "[WARN]",
        }
    }

    fn pick(unicode: bool) -> Self {
        if unicode {
            Self::unicode()
        } else {
            Self::ascii()
        }
    }
}

/// Text renderer
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub unicode: bool,
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    pub fn new(unicode: bool, verbose: u8) -> Self {
        Self { unicode, verbose }
    }

    pub fn plan(&self, plan: &Plan) -> String {
        let icons = Icons::pick(self.unicode);
        let mut out = String::new();
        out.push_str(&format!("Plan for {} ({})\n", plan.domain, plan.stack));
        for (index, resource) in plan.resources.iter().enumerate() {
            let deps = if resource.dependencies.is_empty() {
                String::new()
            } else {
                let labels: Vec<&str> = resource.dependencies.iter().map(|k| k.label()).collect();
                format!(" {} needs {}", icons.arrow, labels.join(", "))
            };
            let lookup = if resource.kind.is_lookup() {
                " (lookup)"
            } else {
                ""
            };
            out.push_str(&format!(
                "  {}. {} [{}]{}{}\n",
                index + 1,
                resource.kind,
                resource.logical_id,
                lookup,
                deps
            ));
        }
        out
    }

    pub fn apply_report(&self, report: &ApplyReport) -> String {
        let icons = Icons::pick(self.unicode);
        let mut out = String::new();

        let headline = if report.is_success() {
            format!("{} {} is live", icons.check, report.domain)
        } else {
            format!("{} {} is incomplete", icons.cross, report.domain)
        };
        out.push_str(&headline);
        out.push('\n');

        for (kind, outcome) in &report.outcomes {
            let line = match outcome {
                ResourceOutcome::Applied {
                    physical_id,
                    created,
                } => format!(
                    "{} {} {} ({})",
                    icons.check,
                    kind,
                    if *created { "created" } else { "updated" },
                    physical_id
                ),
                ResourceOutcome::Unchanged { physical_id } => {
                    format!("{} {} unchanged ({})", icons.skip, kind, physical_id)
                }
                ResourceOutcome::Failed { error } => {
                    format!("{} {} failed: {}", icons.cross, kind, error)
                }
                ResourceOutcome::Blocked { unmet } => {
                    format!("{} {} blocked on {}", icons.warn, kind, labels(unmet))
                }
                ResourceOutcome::Aborted => format!("{} {} not attempted", icons.skip, kind),
            };
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }

        if let Some(deployment) = &report.deployment {
            out.push_str(&format!(
                "  Content: {} uploaded, {} deleted, {} unchanged\n",
                deployment.uploaded_object_count,
                deployment.deleted_object_count,
                deployment.unchanged_object_count
            ));
            match (&deployment.invalidation_id, deployment.completion_status) {
                (Some(id), _) => out.push_str(&format!("  Invalidation: {}\n", id)),
                (None, CompletionStatus::SyncedInvalidationPending) => out.push_str(&format!(
                    "  {} Invalidation pending; cached assets may be stale until the next apply\n",
                    icons.warn
                )),
                (None, _) => {}
            }
        }

        if let Some(summary) = failure_summary(report) {
            out.push_str(&format!("  {}\n", summary));
        }
        out
    }

    pub fn destroy_report(&self, report: &DestroyReport) -> String {
        let icons = Icons::pick(self.unicode);
        let mut out = format!("{} {} torn down\n", icons.check, report.domain);
        for (kind, physical_id) in &report.destroyed {
            out.push_str(&format!("  {} {} deleted ({})\n", icons.check, kind, physical_id));
        }
        if self.verbose > 0 {
            for kind in &report.absent {
                out.push_str(&format!("  {} {} did not exist\n", icons.skip, kind));
            }
        }
        if report.deleted_object_count > 0 {
            out.push_str(&format!(
                "  Emptied bucket: {} objects\n",
                report.deleted_object_count
            ));
        }
        out
    }

    pub fn status(&self, states: &[SiteState]) -> String {
        let icons = Icons::pick(self.unicode);
        if states.is_empty() {
            return "No sites recorded\n".to_string();
        }

        let mut out = String::new();
        for state in states {
            out.push_str(&format!("{}\n", state.domain));
            for (logical_id, record) in &state.resources {
                out.push_str(&format!(
                    "  {} [{}] {}\n",
                    record.kind, logical_id, record.physical_id
                ));
            }
            match &state.last_deployment {
                Some(deployment) => out.push_str(&format!(
                    "  Last deploy: {} ({} uploaded)\n",
                    deployment.at.format("%Y-%m-%d %H:%M:%S UTC"),
                    deployment.uploaded_object_count
                )),
                None => out.push_str("  Never deployed\n"),
            }
            if state.pending_invalidation {
                out.push_str(&format!("  {} Invalidation pending\n", icons.warn));
            }
        }
        out
    }
}

fn labels(kinds: &[ResourceKind]) -> String {
    kinds
        .iter()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line naming what stopped a site, if anything did
pub fn failure_summary(report: &ApplyReport) -> Option<String> {
    if let Some((kind, error)) = report.first_failure() {
        let blocked: Vec<String> = report
            .blocked()
            .map(|(k, unmet)| format!("{} (needs {})", k, labels(unmet)))
            .collect();
        let mut line = format!("{} failed: {}", kind, error);
        if !blocked.is_empty() {
            line.push_str(&format!("; blocked: {}", blocked.join(", ")));
        }
        return Some(line);
    }

    if let Some(deployment) = &report.deployment {
        if !deployment.is_complete() {
            return Some(format!(
                "Deployment incomplete: {}",
                completion_label(deployment.completion_status)
            ));
        }
    }
    None
}

fn completion_label(status: CompletionStatus) -> &'static str {
    match status {
        CompletionStatus::Invalidated => "invalidated",
        CompletionStatus::SyncedInvalidationPending => "synced, invalidation pending",
        CompletionStatus::SyncFailed => "sync failed",
        CompletionStatus::Cancelled => "cancelled",
    }
}

pub fn plan_json(plan: &Plan) -> serde_json::Value {
    serde_json::json!({
        "domain": plan.domain.as_str(),
        "stack": plan.stack,
        "resources": plan.resources.iter().map(|r| serde_json::json!({
            "kind": r.kind,
            "logical_id": r.logical_id.as_str(),
            "depends_on": r.dependencies,
        })).collect::<Vec<_>>(),
    })
}

pub fn apply_report_json(report: &ApplyReport) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|(kind, outcome)| {
            let mut entry = serde_json::json!({ "kind": kind });
            match outcome {
                ResourceOutcome::Applied {
                    physical_id,
                    created,
                } => {
                    entry["status"] = (if *created { "created" } else { "updated" }).into();
                    entry["physical_id"] = physical_id.as_str().into();
                }
                ResourceOutcome::Unchanged { physical_id } => {
                    entry["status"] = "unchanged".into();
                    entry["physical_id"] = physical_id.as_str().into();
                }
                ResourceOutcome::Failed { error } => {
                    entry["status"] = "failed".into();
                    entry["error"] = error.to_string().into();
                    entry["error_kind"] = error.kind().into();
                    entry["retryable"] = error.is_retryable().into();
                }
                ResourceOutcome::Blocked { unmet } => {
                    entry["status"] = "blocked".into();
                    entry["unmet"] = serde_json::json!(unmet);
                }
                ResourceOutcome::Aborted => {
                    entry["status"] = "aborted".into();
                }
            }
            entry
        })
        .collect();

    serde_json::json!({
        "domain": report.domain.as_str(),
        "success": report.is_success(),
        "resources": resources,
        "deployment": report.deployment,
    })
}

pub fn site_run_json(run: &SiteRun) -> serde_json::Value {
    match &run.result {
        Ok(report) => apply_report_json(report),
        Err(error) => serde_json::json!({
            "domain": run.domain.as_str(),
            "success": false,
            "error": error.to_string(),
            "error_kind": error.kind(),
        }),
    }
}

pub fn destroy_report_json(report: &DestroyReport) -> serde_json::Value {
    serde_json::json!({
        "domain": report.domain.as_str(),
        "destroyed": report.destroyed.iter().map(|(kind, id)| serde_json::json!({
            "kind": kind,
            "physical_id": id,
        })).collect::<Vec<_>>(),
        "absent": report.absent,
        "deleted_objects": report.deleted_object_count,
    })
}

pub fn status_json(states: &[SiteState]) -> serde_json::Value {
    serde_json::json!({ "sites": states })
}
