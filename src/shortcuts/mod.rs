//! Modifier keys and the bindings that map them to actions.
//!
//! - `types`: the `Modifier` enum and its parsing
//! - `bindings`: per-kind modifier → action name table
//! - `resolver`: picks the action for a (kind, modifier, override) request

mod bindings;
mod resolver;
mod types;

pub use bindings::ModifierBindings;
pub use resolver::{ResolvedBy, Resolver};
pub use types::{Modifier, ModifierParseError};
