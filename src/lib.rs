//! Browser Actions - pluggable tab and URL actions for a launcher
//!
//! This library discovers action scripts, indexes them by kind, resolves
//! which one a modifier key (or an explicit name) selects, and runs it
//! against a browser tab or a URL.

pub mod actions;
pub mod blacklist;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod feedback;
pub mod logging;
pub mod shortcuts;

// Caller-facing surface
pub use actions::{ActionDescriptor, ActionKind, Registry, Target};
pub use context::Context;
pub use error::{ActionError, ErrorSeverity, Result};
pub use executor::RunResult;
pub use shortcuts::{Modifier, ModifierBindings};
