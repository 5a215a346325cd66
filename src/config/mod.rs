//! Configuration module - paths, modifier bindings and probe settings
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values and the directory scan order
//! - `types` - `ConfigFile` (on disk), `ConfigOverrides` (CLI), `Config` (resolved)
//! - `loader` - Layering of defaults, file, environment and CLI

mod defaults;
mod loader;
mod types;

use crate::actions::ActionKind;
use crate::shortcuts::Modifier;

pub use defaults::{ScriptRoot, ENV_PREFIX, LOG_DIR_NAME, SCAN_ORDER};
pub use loader::{load_config, read_config_file, resolve_data_dir};
pub use types::{Config, ConfigFile, ConfigOverrides};

/// Environment variable holding the binding for `kind` + `modifier`,
/// e.g. `BROWSER_ACTIONS_URL_OPT`.
pub fn binding_env_var(kind: ActionKind, modifier: Modifier) -> String {
    format!(
        "{}_{}_{}",
        ENV_PREFIX,
        kind.dir_name().to_ascii_uppercase(),
        modifier.as_str().to_ascii_uppercase()
    )
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
