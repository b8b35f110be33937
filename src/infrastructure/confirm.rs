//! Interactive Confirmer
//!
//! Prompts on the terminal before a teardown.

use crate::domain::ports::Confirmer;

/// Asks on stderr with a `[y/N]` prompt. Any prompt failure counts as "no".
#[derive(Debug, Default)]
pub struct InteractiveConfirmer;

impl InteractiveConfirmer {
    pub fn new() -> Self {
        Self
    }
}

impl Confirmer for InteractiveConfirmer {
    fn confirm_destroy(&self, domain: &str, resources: &[String]) -> bool {
        eprintln!();
        eprintln!("Destroying {} removes:", domain);
        for resource in resources {
            eprintln!("  - {}", resource);
        }
        eprintln!();

        use dialoguer::Confirm;
        Confirm::new()
            .with_prompt(format!("Destroy {} resources of {}?", resources.len(), domain))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
