//! Action discovery and indexing
//!
//! - `types`: ActionKind, ActionDescriptor, Target
//! - `metadata`: header comments, sidecar icons, the describe probe
//! - `loader`: ScriptScanner, walks action directories
//! - `registry`: Registry, the immutable per-invocation index

mod loader;
mod metadata;
mod registry;
mod types;

pub use loader::{Duplicate, ScanReport, ScriptScanner};
pub use metadata::{parse_description, parse_header, HeaderMetadata, SelfDescription};
pub use registry::Registry;
pub use types::{ActionDescriptor, ActionKind, Target};
