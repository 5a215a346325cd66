//! Per-kind modifier → action name bindings.
//!
//! Supplied by configuration and consumed read-only by the resolver.
//! Format (JSON, one object per action kind):
//!
//! ```json
//! { "default": "open", "ctrl": "archive", "opt": null, "fn": "", "shift": "copy-url" }
//! ```
//!
//! Missing, `null` and empty values all mean "not bound".

use serde::{Deserialize, Serialize};

use super::types::Modifier;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctrl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt: Option<String>,
    #[serde(default, rename = "fn", skip_serializing_if = "Option::is_none")]
    pub fn_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
}

impl ModifierBindings {
    fn slot(&self, modifier: Modifier) -> &Option<String> {
        match modifier {
            Modifier::Default => &self.default,
            Modifier::Ctrl => &self.ctrl,
            Modifier::Opt => &self.opt,
            Modifier::Fn => &self.fn_key,
            Modifier::Shift => &self.shift,
        }
    }

    fn slot_mut(&mut self, modifier: Modifier) -> &mut Option<String> {
        match modifier {
            Modifier::Default => &mut self.default,
            Modifier::Ctrl => &mut self.ctrl,
            Modifier::Opt => &mut self.opt,
            Modifier::Fn => &mut self.fn_key,
            Modifier::Shift => &mut self.shift,
        }
    }

    /// Action name bound to `modifier`, ignoring blank values.
    pub fn get(&self, modifier: Modifier) -> Option<&str> {
        self.slot(modifier)
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Bind or unbind a slot. Blank names unbind.
    pub fn set(&mut self, modifier: Modifier, name: Option<String>) {
        *self.slot_mut(modifier) = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }

    pub fn with(mut self, modifier: Modifier, name: impl Into<String>) -> Self {
        self.set(modifier, Some(name.into()));
        self
    }

    /// Bound slots in canonical modifier order.
    pub fn iter(&self) -> impl Iterator<Item = (Modifier, &str)> + '_ {
        Modifier::ALL
            .into_iter()
            .filter_map(move |m| self.get(m).map(|name| (m, name)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
