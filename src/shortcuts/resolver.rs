//! Decides which action runs for a (kind, modifier, override) request.
//!
//! Order: explicit override → requested modifier binding → default binding.
//! An explicit override never falls back, and nothing is ever substituted
//! beyond the default binding.

use tracing::{debug, warn};

use crate::actions::{ActionDescriptor, ActionKind, Registry};
use crate::error::{ActionError, Result};

use super::bindings::ModifierBindings;
use super::types::Modifier;

/// How an action was picked, for logging and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedBy {
    Override,
    Binding(Modifier),
    /// The requested modifier had no usable binding, the default was used.
    Fallback,
}

pub struct Resolver<'a> {
    registry: &'a Registry,
    tab: &'a ModifierBindings,
    url: &'a ModifierBindings,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a Registry,
        tab: &'a ModifierBindings,
        url: &'a ModifierBindings,
    ) -> Self {
        Self { registry, tab, url }
    }

    pub fn bindings(&self, kind: ActionKind) -> &'a ModifierBindings {
        match kind {
            ActionKind::Tab => self.tab,
            ActionKind::Url => self.url,
        }
    }

    pub fn resolve(
        &self,
        kind: ActionKind,
        modifier: Modifier,
        explicit: Option<&str>,
    ) -> Result<&'a ActionDescriptor> {
        self.resolve_with_source(kind, modifier, explicit)
            .map(|(action, _)| action)
    }

    pub fn resolve_with_source(
        &self,
        kind: ActionKind,
        modifier: Modifier,
        explicit: Option<&str>,
    ) -> Result<(&'a ActionDescriptor, ResolvedBy)> {
        if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
            let action = self.registry.by_name(name, kind)?;
            debug!(kind = %kind, name, "Resolved explicit action");
            return Ok((action, ResolvedBy::Override));
        }

        let bindings = self.bindings(kind);
        let mut stale = Vec::new();

        if modifier != Modifier::Default {
            if let Some(name) = bindings.get(modifier) {
                match self.registry.get(name, kind) {
                    Some(action) => {
                        debug!(kind = %kind, modifier = %modifier, name, "Resolved bound action");
                        return Ok((action, ResolvedBy::Binding(modifier)));
                    }
                    None => {
                        warn!(kind = %kind, modifier = %modifier, name, "Bound action is not installed");
                        stale.push((modifier, name.to_string()));
                    }
                }
            }
        }

        if let Some(name) = bindings.get(Modifier::Default) {
            match self.registry.get(name, kind) {
                Some(action) => {
                    let source = if modifier == Modifier::Default {
                        ResolvedBy::Binding(Modifier::Default)
                    } else {
                        ResolvedBy::Fallback
                    };
                    debug!(kind = %kind, modifier = %modifier, name, ?source, "Resolved default action");
                    return Ok((action, source));
                }
                None => {
                    warn!(kind = %kind, name, "Default action is not installed");
                    stale.push((Modifier::Default, name.to_string()));
                }
            }
        }

        Err(ActionError::NoActionConfigured {
            kind,
            modifier,
            stale,
        })
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
