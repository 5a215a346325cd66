//! Configuration type definitions
//!
//! `ConfigFile` is what `config.json` may contain; every field is optional.
//! `Config` is the resolved result of all layers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::error::{ActionError, Result};
use crate::shortcuts::{Modifier, ModifierBindings};

use super::defaults::*;

/// On-disk configuration (`<data_dir>/config.json`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Directory holding the bundled `scripts/` and `icons/` (default: next to the executable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundled_dir: Option<String>,
    #[serde(default)]
    pub tab: ModifierBindings,
    #[serde(default)]
    pub url: ModifierBindings,
    /// Allow the `--describe` probe (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_descriptions: Option<bool>,
}

/// Values given on the command line, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bundled_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// Empty names unbind the slot
    pub bindings: Vec<(ActionKind, Modifier, String)>,
    pub probe_descriptions: Option<bool>,
}

/// Effective configuration, built once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub bundled_dir: PathBuf,
    pub data_dir: PathBuf,
    pub tab: ModifierBindings,
    pub url: ModifierBindings,
    pub probe_descriptions: bool,
}

impl Config {
    /// Config with no bindings.
    pub fn new(bundled_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Config {
            bundled_dir: bundled_dir.into(),
            data_dir: data_dir.into(),
            tab: ModifierBindings::default(),
            url: ModifierBindings::default(),
            probe_descriptions: DEFAULT_PROBE_DESCRIPTIONS,
        }
    }

    pub fn bindings(&self, kind: ActionKind) -> &ModifierBindings {
        match kind {
            ActionKind::Tab => &self.tab,
            ActionKind::Url => &self.url,
        }
    }

    pub fn bindings_mut(&mut self, kind: ActionKind) -> &mut ModifierBindings {
        match kind {
            ActionKind::Tab => &mut self.tab,
            ActionKind::Url => &mut self.url,
        }
    }

    fn root(&self, root: ScriptRoot) -> &Path {
        match root {
            ScriptRoot::Bundled => &self.bundled_dir,
            ScriptRoot::User => &self.data_dir,
        }
    }

    /// `<root>/scripts/<kind>`
    pub fn script_dir(&self, root: ScriptRoot, kind: ActionKind) -> PathBuf {
        self.root(root)
            .join(SCRIPTS_DIR_NAME)
            .join(kind.dir_name())
    }

    /// Action directories in `SCAN_ORDER`.
    pub fn script_dirs(&self) -> Vec<PathBuf> {
        SCAN_ORDER
            .iter()
            .map(|&(root, kind)| self.script_dir(root, kind))
            .collect()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn blacklist_path(&self) -> PathBuf {
        self.data_dir.join(BLACKLIST_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Create the user script directories. Bundled ones are never created.
    pub fn ensure_user_dirs(&self) -> Result<()> {
        for (root, kind) in SCAN_ORDER {
            if root != ScriptRoot::User {
                continue;
            }
            let dir = self.script_dir(root, kind);
            fs::create_dir_all(&dir)
                .map_err(|source| ActionError::Discovery { path: dir, source })?;
        }
        Ok(())
    }
}
