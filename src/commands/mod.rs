pub mod apply;
pub mod destroy;
pub mod plan;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use edgesite::presentation::Session;

/// Flags every command shares
pub struct GlobalArgs<'a> {
    pub json: bool,
    pub verbose: u8,
    pub config: Option<&'a Path>,
    pub cloud: Option<&'a Path>,
}

/// Resolve configuration from the working directory and surface its warnings
pub fn open_session(args: &GlobalArgs<'_>) -> Result<Session> {
    let project_root = std::env::current_dir().context("Could not determine current directory")?;
    let session = Session::open(&project_root, args.config, args.cloud)?;

    if !args.json {
        if let Some(path) = &session.loaded.path {
            crate::ui::output::print_config_warnings(path, session.warnings());
        }
    }
    Ok(session)
}
