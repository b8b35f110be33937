//! Common test utilities for Edgesite CLI and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated project directory, user config dir and cloud file
//! - Assertion macros: `assert_output_contains!`, `assert_bucket_keys!`, etc.
//! - Fixtures: Reusable configuration and site content

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fixtures;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
