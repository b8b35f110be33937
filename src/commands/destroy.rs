use anyhow::{bail, Result};
use is_terminal::IsTerminal;

use edgesite::application::{destroy_site, teardown_targets};
use edgesite::domain::ports::{AssumeYes, Confirmer};
use edgesite::infrastructure::InteractiveConfirmer;
use edgesite::presentation::create_event_sink;
use edgesite::presentation::output::{destroy_report_json, TextRenderer};

use super::{open_session, GlobalArgs};

pub fn cmd_destroy(args: &GlobalArgs<'_>, site: &str, yes: bool) -> Result<()> {
    let session = open_session(args)?;
    let spec = session.config().find_site(site, &session.base_dir)?;

    let confirmer: Box<dyn Confirmer> = if yes {
        Box::new(AssumeYes)
    } else if args.json || !std::io::stdin().is_terminal() {
        bail!("Refusing to destroy {} without --yes in a non-interactive session", site);
    } else {
        Box::new(InteractiveConfirmer::new())
    };

    let targets: Vec<String> = teardown_targets(&spec)?
        .into_iter()
        .map(|kind| kind.to_string())
        .collect();
    if !confirmer.confirm_destroy(spec.domain_name.as_str(), &targets) {
        if !args.json {
            eprintln!("Aborted.");
        }
        return Ok(());
    }

    let events = create_event_sink(args.json, args.verbose);
    let state = session.state_repository();
    let report = destroy_site(
        &session.providers(),
        &session.context(&spec),
        &spec,
        state.as_ref(),
        events.as_ref(),
    )?;

    if args.json {
        let mut json = destroy_report_json(&report);
        json["event"] = "report".into();
        crate::ui::output::print_json(&json);
    } else {
        let renderer = TextRenderer::new(std::io::stdout().is_terminal(), args.verbose);
        print!("{}", renderer.destroy_report(&report));
    }
    Ok(())
}
