//! In-memory index over discovered actions.
//!
//! Uses Vec for deterministic (discovery) order and HashMap for O(1) lookup.
//! Built once per invocation and never mutated afterwards.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::error::{ActionError, Result};

use super::loader::ScriptScanner;
use super::types::{ActionDescriptor, ActionKind};

#[derive(Debug, Default)]
struct KindIndex {
    actions: Vec<ActionDescriptor>,
    by_name: HashMap<String, usize>,
    blacklisted: Vec<String>,
}

impl KindIndex {
    fn insert(&mut self, descriptor: ActionDescriptor) {
        if !descriptor.enabled {
            self.blacklisted.push(descriptor.name);
            return;
        }
        if self.by_name.contains_key(&descriptor.name) {
            warn!(
                name = %descriptor.name,
                dropped = %descriptor.path.display(),
                "Duplicate action ignored"
            );
            return;
        }
        self.by_name
            .insert(descriptor.name.clone(), self.actions.len());
        self.actions.push(descriptor);
    }
}

/// All usable (non-blacklisted) actions, split by kind.
#[derive(Debug, Default)]
pub struct Registry {
    tab: KindIndex,
    url: KindIndex,
}

impl Registry {
    /// Scan `dirs` in order and index the result.
    #[instrument(level = "debug", skip_all)]
    pub fn build<P: AsRef<std::path::Path>>(scanner: &ScriptScanner, dirs: &[P]) -> Result<Self> {
        let report = scanner.scan(dirs)?;
        let registry = Self::from_descriptors(report.descriptors);
        info!(
            tab = registry.all(ActionKind::Tab).len(),
            url = registry.all(ActionKind::Url).len(),
            blacklisted = registry.blacklisted(ActionKind::Tab).len()
                + registry.blacklisted(ActionKind::Url).len(),
            "Action registry built"
        );
        Ok(registry)
    }

    /// Index descriptors in the given order. Disabled descriptors are
    /// excluded entirely; the first descriptor seen for a name wins.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ActionDescriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.index_mut(descriptor.kind).insert(descriptor);
        }
        debug!(
            tab = registry.tab.actions.len(),
            url = registry.url.actions.len(),
            "Indexed actions"
        );
        registry
    }

    fn index(&self, kind: ActionKind) -> &KindIndex {
        match kind {
            ActionKind::Tab => &self.tab,
            ActionKind::Url => &self.url,
        }
    }

    fn index_mut(&mut self, kind: ActionKind) -> &mut KindIndex {
        match kind {
            ActionKind::Tab => &mut self.tab,
            ActionKind::Url => &mut self.url,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str, kind: ActionKind) -> Option<&ActionDescriptor> {
        let index = self.index(kind);
        index.by_name.get(name).map(|&i| &index.actions[i])
    }

    /// Like [`Registry::get`] but fails with `UnknownAction`.
    pub fn by_name(&self, name: &str, kind: ActionKind) -> Result<&ActionDescriptor> {
        self.get(name, kind).ok_or_else(|| ActionError::UnknownAction {
            kind,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str, kind: ActionKind) -> bool {
        self.get(name, kind).is_some()
    }

    /// Actions of `kind` in discovery order.
    pub fn all(&self, kind: ActionKind) -> &[ActionDescriptor] {
        &self.index(kind).actions
    }

    /// Names discovered for `kind` but excluded by the blacklist.
    pub fn blacklisted(&self, kind: ActionKind) -> &[String] {
        &self.index(kind).blacklisted
    }

    pub fn len(&self) -> usize {
        self.tab.actions.len() + self.url.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor(name: &str, kind: ActionKind, path: &str, enabled: bool) -> ActionDescriptor {
        ActionDescriptor {
            name: name.to_string(),
            title: name.to_string(),
            icon: PathBuf::from(kind.default_icon()),
            kind,
            path: PathBuf::from(path),
            enabled,
        }
    }

    #[test]
    fn lookup_is_per_kind_and_case_sensitive() {
        let registry = Registry::from_descriptors(vec![
            descriptor("close", ActionKind::Tab, "/b/tab/close.sh", true),
            descriptor("copy", ActionKind::Url, "/b/url/copy.sh", true),
        ]);
        assert!(registry.get("close", ActionKind::Tab).is_some());
        assert!(registry.get("close", ActionKind::Url).is_none());
        assert!(registry.get("Close", ActionKind::Tab).is_none());
        assert!(registry.contains("copy", ActionKind::Url));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn first_descriptor_wins() {
        let registry = Registry::from_descriptors(vec![
            descriptor("open", ActionKind::Url, "/bundled/url/open.sh", true),
            descriptor("open", ActionKind::Url, "/user/url/open.py", true),
        ]);
        let open = registry.by_name("open", ActionKind::Url).unwrap();
        assert_eq!(open.path, PathBuf::from("/bundled/url/open.sh"));
        assert_eq!(registry.all(ActionKind::Url).len(), 1);
    }

    #[test]
    fn disabled_descriptors_are_excluded_not_flagged() {
        let registry = Registry::from_descriptors(vec![
            descriptor("keep", ActionKind::Tab, "/t/keep.sh", true),
            descriptor("gone", ActionKind::Tab, "/t/gone.sh", false),
        ]);
        assert!(registry.all(ActionKind::Tab).iter().all(|a| a.enabled));
        assert!(matches!(
            registry.by_name("gone", ActionKind::Tab),
            Err(ActionError::UnknownAction { .. })
        ));
        assert_eq!(registry.blacklisted(ActionKind::Tab), ["gone".to_string()]);
    }

    #[test]
    fn all_preserves_discovery_order() {
        let registry = Registry::from_descriptors(vec![
            descriptor("zeta", ActionKind::Tab, "/t/zeta.sh", true),
            descriptor("alpha", ActionKind::Tab, "/t/alpha.sh", true),
            descriptor("mid", ActionKind::Tab, "/t/mid.sh", true),
        ]);
        let names: Vec<_> = registry
            .all(ActionKind::Tab)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.all(ActionKind::Url).is_empty());
    }
}
