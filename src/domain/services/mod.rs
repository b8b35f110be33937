//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod backoff;
mod graph;
mod planner;

pub use backoff::Backoff;
pub use graph::{GraphError, ResourceGraph};
pub use planner::{ObjectAction, PlannedObject, Planner, SyncPlan};
