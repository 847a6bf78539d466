//! Shared utilities for ticker-brief
//!
//! Logging setup and small environment helpers used by the rest of the
//! workspace.

pub mod env;
pub mod logging;

pub use env::{EnvLookup, ProcessEnv, first_non_empty};
pub use logging::{DEFAULT_FILTER, init_tracing, init_tracing_with};
