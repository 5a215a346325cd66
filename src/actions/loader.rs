//! Script discovery from the file system.
//!
//! Directories are scanned in the order given; within a directory, entries
//! are visited in file-name order. For each (kind, name) pair the first
//! script discovered wins and later ones are reported as duplicates.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::blacklist::Blacklist;
use crate::error::{ActionError, Result, ResultExt};
use crate::executor::is_runnable;

use super::metadata::{find_sidecar_icon, probe_description, read_header, resolve_icon};
use super::types::{ActionDescriptor, ActionKind};

/// A later script dropped because its name was already taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub name: String,
    pub kind: ActionKind,
    pub kept: PathBuf,
    pub dropped: PathBuf,
}

/// Result of a scan, in discovery order
#[derive(Debug, Default)]
pub struct ScanReport {
    pub descriptors: Vec<ActionDescriptor>,
    pub duplicates: Vec<Duplicate>,
}

/// Walks action directories and builds descriptors.
#[derive(Debug, Clone)]
pub struct ScriptScanner {
    bundled_dir: PathBuf,
    blacklist: Blacklist,
    probe: bool,
}

impl ScriptScanner {
    /// `bundled_dir` is where the default kind icons live.
    pub fn new(bundled_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundled_dir: bundled_dir.into(),
            blacklist: Blacklist::default(),
            probe: true,
        }
    }

    /// Names in `blacklist` are discovered with `enabled = false`.
    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Enable or disable the `--describe` probe for scripts that opt in.
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    #[instrument(level = "debug", skip_all)]
    pub fn scan<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        let mut seen: HashMap<(ActionKind, String), PathBuf> = HashMap::new();

        for dir in dirs {
            let dir = dir.as_ref();
            for descriptor in self.scan_dir(dir)? {
                let key = (descriptor.kind, descriptor.name.clone());
                if let Some(kept) = seen.get(&key) {
                    debug!(
                        name = %descriptor.name,
                        kind = %descriptor.kind,
                        kept = %kept.display(),
                        dropped = %descriptor.path.display(),
                        "Dropping duplicate action"
                    );
                    report.duplicates.push(Duplicate {
                        name: descriptor.name,
                        kind: descriptor.kind,
                        kept: kept.clone(),
                        dropped: descriptor.path,
                    });
                    continue;
                }
                seen.insert(key, descriptor.path.clone());
                report.descriptors.push(descriptor);
            }
        }

        info!(
            dirs = dirs.len(),
            count = report.descriptors.len(),
            duplicates = report.duplicates.len(),
            "Scanned action directories"
        );
        Ok(report)
    }

    /// Descriptors for one directory, sorted by file name.
    ///
    /// A missing directory is empty. Any other failure to list it is a
    /// `Discovery` error.
    fn scan_dir(&self, dir: &Path) -> Result<Vec<ActionDescriptor>> {
        let discovery = |source: io::Error| ActionError::Discovery {
            path: dir.to_path_buf(),
            source,
        };

        match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(dir = %dir.display(), "Action path is not a directory, skipping");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Action directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(discovery(e)),
        }

        let mut entries = fs::read_dir(dir)
            .map_err(discovery)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(discovery)?;
        entries.sort();

        let dir_kind = ActionKind::from_dir(dir);
        let mut descriptors = Vec::new();
        for path in entries {
            if let Some(descriptor) = self.describe(&path, dir_kind) {
                descriptors.push(descriptor);
            }
        }

        debug!(
            dir = %dir.display(),
            kind = ?dir_kind,
            count = descriptors.len(),
            "Scanned action directory"
        );
        Ok(descriptors)
    }

    /// Build a descriptor for `path`, or `None` if it is not an action script.
    fn describe(&self, path: &Path, dir_kind: Option<ActionKind>) -> Option<ActionDescriptor> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.starts_with('.') {
            return None;
        }

        // Follows symlinks; a dangling link is skipped
        let meta = fs::metadata(path).ok()?;
        if !is_runnable(path, &meta) {
            return None;
        }

        let name = path.file_stem()?.to_str()?.to_string();
        let enabled = !self.blacklist.contains(&name);
        let header = read_header(path);

        let kind = match dir_kind.or(header.kind) {
            Some(kind) => kind,
            None => {
                debug!(path = %path.display(), "Script has no kind, skipping");
                return None;
            }
        };

        let mut title = header.title.clone();
        let mut icon = match header.icon.as_deref() {
            Some(icon) => Some(resolve_icon(path, icon)),
            None => find_sidecar_icon(path),
        };

        // Blacklisted scripts are never executed, not even to describe themselves
        if enabled && self.probe && header.describe {
            if let Some(described) = probe_description(path).warn_on_err() {
                if let Some(t) = described.title.filter(|t| !t.trim().is_empty()) {
                    title = Some(t.trim().to_string());
                }
                if let Some(i) = described.icon.filter(|i| !i.trim().is_empty()) {
                    icon = Some(resolve_icon(path, i.trim()));
                }
            }
        }

        if !enabled {
            debug!(name = %name, kind = %kind, "Action is blacklisted");
        }

        Some(ActionDescriptor {
            title: title.unwrap_or_else(|| name.clone()),
            icon: icon.unwrap_or_else(|| self.bundled_dir.join(kind.default_icon())),
            name,
            kind,
            path: path.to_path_buf(),
            enabled,
        })
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
