//! Persisted set of action names excluded from discovery.
//!
//! Stored as plain text, one name per line. Blank lines and `#` comments are
//! ignored. Loaded fresh on every invocation, never cached.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so a concurrent reader sees either the old or the new
//! set and never a partial file.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::error::{ActionError, Result};

/// Loaded blacklist contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist(BTreeSet<String>);

impl Blacklist {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn parse(content: &str) -> Self {
        Self(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect(),
        )
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for name in &self.0 {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<String> for Blacklist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// File-backed blacklist store
#[derive(Debug, Clone)]
pub struct BlacklistStore {
    path: PathBuf,
}

impl BlacklistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted set. A missing file is an empty blacklist.
    pub fn load(&self) -> Result<Blacklist> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let blacklist = Blacklist::parse(&content);
                debug!(
                    path = %self.path.display(),
                    count = blacklist.len(),
                    "Loaded blacklist"
                );
                Ok(blacklist)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No blacklist file, using empty set");
                Ok(Blacklist::default())
            }
            Err(source) => Err(self.error(source)),
        }
    }

    /// Add names. Already-present names are a no-op.
    ///
    /// Returns how many names were newly added. Names the file format cannot
    /// hold are rejected before anything is written.
    #[instrument(level = "debug", skip_all)]
    pub fn add<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .map(validate_name)
            .collect::<Result<Vec<_>>>()?;

        let mut blacklist = self.load()?;
        let mut added = 0;
        for name in names {
            if blacklist.0.insert(name) {
                added += 1;
            }
        }
        if added > 0 {
            self.save(&blacklist)?;
        }
        info!(added, total = blacklist.len(), "Blacklist updated");
        Ok(added)
    }

    /// Remove names. Absent names are ignored.
    ///
    /// Returns how many names were removed.
    #[instrument(level = "debug", skip_all)]
    pub fn remove<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blacklist = self.load()?;
        let mut removed = 0;
        for name in names {
            if blacklist.0.remove(name.as_ref().trim()) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.save(&blacklist)?;
        }
        info!(removed, total = blacklist.len(), "Blacklist updated");
        Ok(removed)
    }

    fn save(&self, blacklist: &Blacklist) -> Result<()> {
        atomic_write(&self.path, blacklist.render().as_bytes()).map_err(|e| self.error(e))
    }

    fn error(&self, source: io::Error) -> ActionError {
        ActionError::Blacklist {
            path: self.path.clone(),
            source,
        }
    }
}

/// A name must survive a save/load round trip through the line format.
fn validate_name(name: String) -> Result<String> {
    let reason = if name.starts_with('#') {
        "names starting with '#' are comments"
    } else if name.contains(['\n', '\r']) {
        "names cannot span lines"
    } else {
        return Ok(name);
    };
    Err(ActionError::InvalidName { name, reason })
}

fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
