use anyhow::Result;
use is_terminal::IsTerminal;

use edgesite::application::plan_site;
use edgesite::presentation::output::{plan_json, TextRenderer};

use super::{open_session, GlobalArgs};

pub fn cmd_plan(args: &GlobalArgs<'_>, site: Option<&str>) -> Result<()> {
    let session = open_session(args)?;
    let renderer = TextRenderer::new(std::io::stdout().is_terminal(), args.verbose);

    for spec in session.sites(site)? {
        let plan = plan_site(&spec)?;
        if args.json {
            crate::ui::output::print_json(&serde_json::json!({
                "event": "plan",
                "plan": plan_json(&plan),
            }));
        } else {
            print!("{}", renderer.plan(&plan));
        }
    }
    Ok(())
}
