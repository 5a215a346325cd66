//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

use crate::actions::ActionKind;

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "browser-actions";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const BLACKLIST_FILE_NAME: &str = "blacklist.txt";
pub const LOG_DIR_NAME: &str = "logs";
pub const SCRIPTS_DIR_NAME: &str = "scripts";

/// Prefix of every environment variable read or set by this crate
pub const ENV_PREFIX: &str = "BROWSER_ACTIONS";
pub const ENV_BUNDLED_DIR: &str = "BROWSER_ACTIONS_BUNDLED_DIR";
pub const ENV_DATA_DIR: &str = "BROWSER_ACTIONS_DATA_DIR";
pub const ENV_PROBE_DESCRIPTIONS: &str = "BROWSER_ACTIONS_PROBE_DESCRIPTIONS";

/// Run `--describe` on scripts that declare `Describe: true`
pub const DEFAULT_PROBE_DESCRIPTIONS: bool = true;

/// Where a script directory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptRoot {
    /// Shipped alongside the executable, read-only
    Bundled,
    /// Under the data dir, created on startup
    User,
}

/// Directory scan order. Earlier entries win name collisions, so a user
/// script never shadows a bundled one of the same kind.
pub const SCAN_ORDER: [(ScriptRoot, ActionKind); 4] = [
    (ScriptRoot::Bundled, ActionKind::Tab),
    (ScriptRoot::Bundled, ActionKind::Url),
    (ScriptRoot::User, ActionKind::Tab),
    (ScriptRoot::User, ActionKind::Url),
];
