//! Action types and data structures
//!
//! Core types for the action system: the capability kind, the immutable
//! descriptor produced by discovery, and the target an action runs against.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// What an action operates on.
///
/// Fixed at discovery time by the directory the script was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Operates on an open browser tab (window index + tab index)
    Tab,
    /// Operates on a URL string
    Url,
}

impl ActionKind {
    pub const ALL: [ActionKind; 2] = [ActionKind::Tab, ActionKind::Url];

    /// Directory name that classifies scripts as this kind (`.../tab`, `.../url`)
    pub fn dir_name(self) -> &'static str {
        match self {
            ActionKind::Tab => "tab",
            ActionKind::Url => "url",
        }
    }

    /// Built-in icon used when a script declares none, relative to the bundled dir
    pub fn default_icon(self) -> &'static str {
        match self {
            ActionKind::Tab => "icons/tab.png",
            ActionKind::Url => "icons/url.png",
        }
    }

    /// Classify a directory by its final component.
    pub fn from_dir(dir: &std::path::Path) -> Option<Self> {
        match dir.file_name()?.to_str()? {
            "tab" => Some(ActionKind::Tab),
            "url" => Some(ActionKind::Url),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" => Ok(ActionKind::Tab),
            "url" => Ok(ActionKind::Url),
            other => Err(ActionError::Config(format!("unknown action kind '{other}'"))),
        }
    }
}

/// Metadata about one discovered action script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    /// File name without extension; the lookup and blacklist key
    pub name: String,
    /// Human-facing label (defaults to `name`)
    pub title: String,
    /// Icon path shown by the launcher
    pub icon: PathBuf,
    pub kind: ActionKind,
    /// Backing executable or script, only used by the runner
    pub path: PathBuf,
    /// False when `name` was blacklisted at discovery time
    pub enabled: bool,
}

/// What an action is invoked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based window and tab indices
    Tab { window: u32, tab: u32 },
    Url(url::Url),
}

impl Target {
    /// Build a tab target, rejecting 0 indices.
    pub fn tab(window: u32, tab: u32) -> Result<Self, ActionError> {
        if window == 0 || tab == 0 {
            return Err(ActionError::InvalidTarget(format!(
                "window and tab numbers start at 1 (got window {window}, tab {tab})"
            )));
        }
        Ok(Target::Tab { window, tab })
    }

    /// Parse a URL target.
    pub fn url(value: &str) -> Result<Self, ActionError> {
        url::Url::parse(value.trim())
            .map(Target::Url)
            .map_err(|e| ActionError::InvalidTarget(format!("'{value}' is not a URL: {e}")))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Target::Tab { .. } => ActionKind::Tab,
            Target::Url(_) => ActionKind::Url,
        }
    }

    /// Positional arguments handed to the action script
    pub fn args(&self) -> Vec<String> {
        match self {
            Target::Tab { window, tab } => vec![window.to_string(), tab.to_string()],
            Target::Url(url) => vec![url.to_string()],
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Tab { window, tab } => write!(f, "window {window}, tab {tab}"),
            Target::Url(url) => write!(f, "{url}"),
        }
    }
}
