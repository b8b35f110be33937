//! Apply: orchestration driver and the per-site step it runs

mod options;
mod orchestrator;
mod result;
mod site_step;
mod use_case;

pub use options::ApplyOptions;
pub use orchestrator::{Orchestrator, ResourceStep, StepOutcome};
pub use result::{ApplyReport, ResourceOutcome};
pub use use_case::ApplyUseCase;
