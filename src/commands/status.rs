use anyhow::Result;
use is_terminal::IsTerminal;

use edgesite::domain::ports::StateRepository;
use edgesite::presentation::output::{status_json, TextRenderer};

use super::{open_session, GlobalArgs};

pub fn cmd_status(args: &GlobalArgs<'_>) -> Result<()> {
    let session = open_session(args)?;
    let states = session.state_repository().list()?;

    if args.json {
        crate::ui::output::print_json(&status_json(&states));
    } else {
        let renderer = TextRenderer::new(std::io::stdout().is_terminal(), args.verbose);
        print!("{}", renderer.status(&states));
    }
    Ok(())
}
