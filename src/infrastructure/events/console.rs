//! Console Event Sink
//!
//! Human-readable progress lines on stderr. Per-object and per-poll events
//! only show up with `-v`.

use std::io::{self, Write};
use std::sync::Mutex;

use is_terminal::IsTerminal;

use crate::domain::ports::{ProvisionEvent, ProvisionEventSink};

struct Icons {
    ok: &'static str,
    fail: &'static str,
    same: &'static str,
    blocked: &'static str,
    progress: &'static str,
    trash: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            ok: "✓",
            fail: "✗",
            same: "○",
            blocked: "⚠",
            progress: "●",
            trash: "🗑",
        }
    }

    fn ascii() -> Self {
        Self {
            ok: "[OK]",
            fail: "[FAIL]",
            same: "[ ]",
            blocked: "[WARN]",
            progress: "[..]",
            trash: "[DEL]",
        }
    }
}

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    icons: Icons,
    verbose: u8,
}

impl ConsoleEventSink {
    /// Write to stderr, with unicode icons when stderr is a terminal
    pub fn stderr(verbose: u8) -> Self {
        let dumb = std::env::var("TERM").is_ok_and(|t| t.eq_ignore_ascii_case("dumb"));
        let unicode = io::stderr().is_terminal() && !dumb;
        Self::with_writer(io::stderr(), unicode, verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, unicode: bool, verbose: u8) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            icons: if unicode {
                Icons::unicode()
            } else {
                Icons::ascii()
            },
            verbose,
        }
    }

    fn line(&self, text: String) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", text);
        }
    }

    fn render(&self, event: ProvisionEvent) -> Option<String> {
        let i = &self.icons;
        let text = match event {
            ProvisionEvent::PlanComputed { domain, order } => {
                let steps: Vec<&str> = order.iter().map(|k| k.label()).collect();
                format!("{} {}: {}", i.progress, domain, steps.join(" -> "))
            }
            ProvisionEvent::ResourceStarted { .. } => return None,
            ProvisionEvent::ResourceApplied {
                domain,
                kind,
                physical_id,
                created,
            } => format!(
                "{} {}: {} {} ({})",
                i.ok,
                domain,
                kind,
                if created { "created" } else { "updated" },
                physical_id
            ),
            ProvisionEvent::ResourceUnchanged {
                domain,
                kind,
                physical_id,
            } => format!("{} {}: {} unchanged ({})", i.same, domain, kind, physical_id),
            ProvisionEvent::ResourceFailed {
                domain,
                kind,
                error,
                fatal,
            } => format!(
                "{} {}: {} failed{}: {}",
                i.fail,
                domain,
                kind,
                if fatal { " (fatal)" } else { "" },
                error
            ),
            ProvisionEvent::ResourceBlocked {
                domain,
                kind,
                unmet,
            } => {
                let unmet: Vec<&str> = unmet.iter().map(|k| k.label()).collect();
                format!(
                    "{} {}: {} skipped, waiting on {}",
                    i.blocked,
                    domain,
                    kind,
                    unmet.join(", ")
                )
            }
            ProvisionEvent::CertificatePoll {
                domain,
                attempt,
                waited_secs,
                ..
            } => {
                if self.verbose == 0 {
                    return None;
                }
                format!(
                    "{} {}: waiting for certificate validation (poll {}, {}s)",
                    i.progress,
                    domain,
                    attempt + 1,
                    waited_secs
                )
            }
            ProvisionEvent::ObjectUploaded { domain, key } => {
                if self.verbose == 0 {
                    return None;
                }
                format!("  {} {}: put {}", i.ok, domain, key)
            }
            ProvisionEvent::ObjectDeleted { domain, key } => {
                if self.verbose == 0 {
                    return None;
                }
                format!("  {} {}: delete {}", i.trash, domain, key)
            }
            ProvisionEvent::ContentSynced {
                domain,
                uploaded,
                deleted,
                unchanged,
            } => format!(
                "{} {}: synced {} uploaded, {} deleted, {} unchanged",
                i.ok, domain, uploaded, deleted, unchanged
            ),
            ProvisionEvent::InvalidationIssued {
                domain,
                distribution_id,
                invalidation_id,
            } => format!(
                "{} {}: invalidation {} on {}",
                i.ok, domain, invalidation_id, distribution_id
            ),
            ProvisionEvent::ResourceDestroyed {
                domain,
                kind,
                physical_id,
            } => format!("{} {}: {} destroyed ({})", i.trash, domain, kind, physical_id),
            ProvisionEvent::Completed { .. } => return None,
        };
        Some(text)
    }
}

impl ProvisionEventSink for ConsoleEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        if let Some(text) = self.render(event) {
            self.line(text);
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ResourceKind;

    fn sink(verbose: u8) -> ConsoleEventSink {
        ConsoleEventSink::with_writer(io::sink(), false, verbose)
    }

    #[test]
    fn test_blocked_names_unmet_dependency() {
        let text = sink(0)
            .render(ProvisionEvent::ResourceBlocked {
                domain: "docs.example.com".to_string(),
                kind: ResourceKind::AliasRecord,
                unmet: vec![ResourceKind::Distribution],
            })
            .unwrap();
        assert_eq!(
            text,
            "[WARN] docs.example.com: alias record skipped, waiting on distribution"
        );
    }

    #[test]
    fn test_object_events_need_verbose() {
        let event = ProvisionEvent::ObjectUploaded {
            domain: "docs.example.com".to_string(),
            key: "index.html".to_string(),
        };
        assert!(sink(0).render(event.clone()).is_none());
        assert!(sink(1).render(event).is_some());
        assert!(!sink(0).wants_detailed_events());
    }
}
