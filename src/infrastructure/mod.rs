//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `providers/` - Provider backends (LocalCloud)
//! - `repositories/` - State persistence
//! - `events/` - Console and JSON event sinks
//! - `clock`, `content`, `confirm` - system clock, source tree, prompts

pub mod clock;
pub mod confirm;
pub mod content;
pub mod events;
pub mod providers;
pub mod repositories;

pub use clock::{ManualClock, SystemClock};
pub use confirm::InteractiveConfirmer;
pub use content::FsContentSource;
pub use events::{ConsoleEventSink, JsonEventSink};
pub use providers::LocalCloud;
pub use repositories::TomlStateRepository;
