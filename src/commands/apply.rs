use anyhow::{bail, Result};
use is_terminal::IsTerminal;

use edgesite::application::{apply_all, plan_site};
use edgesite::domain::value_objects::CancelToken;
use edgesite::presentation::create_event_sink;
use edgesite::presentation::output::{failure_summary, plan_json, site_run_json, TextRenderer};

use super::{open_session, GlobalArgs};

pub fn cmd_apply(
    args: &GlobalArgs<'_>,
    site: Option<&str>,
    dry_run: bool,
    cancel: CancelToken,
) -> Result<()> {
    let session = open_session(args)?;
    let sites = session.sites(site)?;
    let renderer = TextRenderer::new(std::io::stdout().is_terminal(), args.verbose);

    if dry_run {
        for spec in &sites {
            let plan = plan_site(spec)?;
            if args.json {
                crate::ui::output::print_json(&serde_json::json!({
                    "event": "plan",
                    "dry_run": true,
                    "plan": plan_json(&plan),
                }));
            } else {
                print!("{}", renderer.plan(&plan));
            }
        }
        return Ok(());
    }

    let use_case = session.apply_use_case(create_event_sink(args.json, args.verbose), cancel);
    let runs = apply_all(&use_case, &sites);

    let mut failures = Vec::new();
    for run in &runs {
        if args.json {
            let mut report = site_run_json(run);
            report["event"] = "report".into();
            crate::ui::output::print_json(&report);
        }

        match &run.result {
            Ok(report) => {
                if !args.json {
                    print!("{}", renderer.apply_report(report));
                }
                if let Some(summary) = failure_summary(report) {
                    failures.push(format!("{}: {}", run.domain, summary));
                }
            }
            Err(error) => {
                if !args.json {
                    println!("{}: {}", run.domain, error);
                }
                failures.push(format!("{}: {}", run.domain, error));
            }
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} sites incomplete\n  {}",
            failures.len(),
            runs.len(),
            failures.join("\n  ")
        );
    }
    Ok(())
}
