//! Modifier key types with parsing and display.
//!
//! The launcher reports which modifier was held when the user actioned a
//! result. Each modifier slot can be bound to a different action.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing a modifier string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifierParseError {
    #[error("unknown modifier '{0}' (expected default, ctrl, opt, fn or shift)")]
    Unknown(String),
}

/// A bindable modifier slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// No modifier held (plain ↩)
    #[default]
    Default,
    Ctrl,
    /// Option / Alt
    Opt,
    Fn,
    Shift,
}

impl Modifier {
    pub const ALL: [Modifier; 5] = [
        Modifier::Default,
        Modifier::Ctrl,
        Modifier::Opt,
        Modifier::Fn,
        Modifier::Shift,
    ];

    /// Canonical config key
    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Default => "default",
            Modifier::Ctrl => "ctrl",
            Modifier::Opt => "opt",
            Modifier::Fn => "fn",
            Modifier::Shift => "shift",
        }
    }

    /// Short label for user-facing messages
    pub fn label(self) -> &'static str {
        match self {
            Modifier::Default => "↩",
            Modifier::Ctrl => "⌃↩",
            Modifier::Opt => "⌥↩",
            Modifier::Fn => "fn↩",
            Modifier::Shift => "⇧↩",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = ModifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "" | "default" | "plain" | "none" | "↩" => Ok(Modifier::Default),
            "ctrl" | "control" | "ctl" | "^" | "⌃" => Ok(Modifier::Ctrl),
            "opt" | "option" | "alt" | "⌥" => Ok(Modifier::Opt),
            "fn" | "function" => Ok(Modifier::Fn),
            "shift" | "shft" | "⇧" => Ok(Modifier::Shift),
            _ => Err(ModifierParseError::Unknown(s.trim().to_string())),
        }
    }
}
