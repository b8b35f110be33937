//! Presentation Layer
//!
//! This layer handles:
//! - Wiring configuration and infrastructure into use cases
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering
//!
//! ## Usage
//!
//! ```ignore
//! use edgesite::presentation::factory::{create_event_sink, Session};
//!
//! let session = Session::open(&project_root, None, None)?;
//! let use_case = session.apply_use_case(create_event_sink(false, 0), cancel);
//! let report = use_case.execute(&spec)?;
//! ```

pub mod factory;
pub mod output;

pub use factory::{create_event_sink, Session};
pub use output::{OutputFormat, TextRenderer};
