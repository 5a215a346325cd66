//! Title/icon/kind metadata for action scripts.
//!
//! Three sources, strongest first:
//! 1. the `--describe` probe (only for scripts declaring `Describe: true`)
//! 2. header comments in the first lines of the script
//! 3. a sidecar image with the same stem (`archive.sh` + `archive.png`)
//!
//! Header format (any of `#`, `//`, `--` as comment leader):
//!
//! ```text
//! #!/bin/bash
//! # Title: Archive Tab
//! # Icon: icons/archive.png
//! # Describe: true
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::executor::{command_for, image_extensions};

use super::types::ActionKind;

/// Only the first lines are scanned for metadata
const HEADER_LINES: usize = 20;
/// Bytes read from a script when looking for its header
const HEADER_BYTES: usize = 8 * 1024;

pub const DESCRIBE_FLAG: &str = "--describe";

const COMMENT_LEADERS: &[&str] = &["//", "--", "#"];

/// Metadata declared in a script's header comments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeaderMetadata {
    pub title: Option<String>,
    pub icon: Option<String>,
    pub kind: Option<ActionKind>,
    pub describe: bool,
}

/// Response of the `--describe` probe
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct SelfDescription {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Parse a single `<leader> Key: value` line.
///
/// Returns the lowercased key and trimmed value.
pub fn parse_metadata_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("#!") {
        return None;
    }
    let body = COMMENT_LEADERS
        .iter()
        .find_map(|leader| trimmed.strip_prefix(leader))?;
    let (key, value) = body.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some((key.to_ascii_lowercase(), value.to_string()))
}

pub fn parse_header(content: &str) -> HeaderMetadata {
    let mut meta = HeaderMetadata::default();
    for line in content.lines().take(HEADER_LINES) {
        let Some((key, value)) = parse_metadata_line(line) else {
            continue;
        };
        match key.as_str() {
            "title" | "name" => meta.title = Some(value),
            "icon" => meta.icon = Some(value),
            "kind" => meta.kind = value.parse().ok(),
            "describe" => {
                meta.describe = matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1")
            }
            _ => {}
        }
    }
    meta
}

/// Read and parse the header of the script at `path`.
///
/// Unreadable or binary files yield empty metadata.
pub fn read_header(path: &Path) -> HeaderMetadata {
    let mut buf = Vec::with_capacity(1024);
    let read = File::open(path).and_then(|f| f.take(HEADER_BYTES as u64).read_to_end(&mut buf));
    match read {
        Ok(_) => parse_header(&String::from_utf8_lossy(&buf)),
        Err(e) => {
            debug!(
                error = %e,
                path = %path.display(),
                "Could not read script header"
            );
            HeaderMetadata::default()
        }
    }
}

/// Image next to the script with the same stem, if any.
pub fn find_sidecar_icon(script: &Path) -> Option<PathBuf> {
    let dir = script.parent()?;
    let stem = script.file_stem()?;
    image_extensions().iter().find_map(|ext| {
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(ext);
        let candidate = dir.join(file_name);
        candidate.is_file().then_some(candidate)
    })
}

/// Resolve an icon reference relative to the script's directory.
pub fn resolve_icon(script: &Path, icon: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(icon).as_ref());
    if expanded.is_absolute() {
        return expanded;
    }
    script
        .parent()
        .map(|dir| dir.join(&expanded))
        .unwrap_or(expanded)
}

/// Parse probe output: a JSON object, or `key: value` lines.
pub fn parse_description(output: &str) -> Option<SelfDescription> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return None;
    }

    let description = if trimmed.starts_with('{') {
        serde_json::from_str::<SelfDescription>(trimmed).ok()?
    } else {
        let mut description = SelfDescription::default();
        for line in trimmed.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim().to_ascii_lowercase().as_str() {
                "title" => description.title = Some(value.to_string()),
                "icon" => description.icon = Some(value.to_string()),
                _ => {}
            }
        }
        description
    };

    let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
    if blank(&description.title) && blank(&description.icon) {
        return None;
    }
    Some(description)
}

/// How long a script gets to answer `--describe`
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const PROBE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Ask the script to describe itself, waiting at most [`PROBE_TIMEOUT`].
pub fn probe_description(script: &Path) -> Result<SelfDescription, String> {
    probe_description_within(script, PROBE_TIMEOUT)
}

/// Ask the script to describe itself. A probe still running after
/// `timeout` is killed.
pub fn probe_description_within(
    script: &Path,
    timeout: Duration,
) -> Result<SelfDescription, String> {
    let mut child = command_for(script)
        .arg(DESCRIBE_FLAG)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("{}: {e}", script.display()))?;

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!(
                    "{}: describe probe timed out after {}ms",
                    script.display(),
                    timeout.as_millis()
                ));
            }
            Ok(None) => std::thread::sleep(PROBE_POLL_INTERVAL),
            Err(e) => return Err(format!("{}: {e}", script.display())),
        }
    };

    if !status.success() {
        return Err(format!(
            "{}: describe probe exited with {}",
            script.display(),
            status
        ));
    }

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)
            .map_err(|e| format!("{}: {e}", script.display()))?;
        stdout = String::from_utf8_lossy(&bytes).into_owned();
    }

    parse_description(&stdout)
        .ok_or_else(|| format!("{}: describe probe returned nothing usable", script.display()))
}
