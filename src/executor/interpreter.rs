//! How an action file is launched.
//!
//! Files with an executable bit are run directly (their shebang decides).
//! Otherwise a known extension maps the file to an interpreter. Anything else
//! is not runnable and is skipped by discovery.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Extension → (program, leading args) for non-executable scripts
const INTERPRETERS: &[(&str, &str, &[&str])] = &[
    ("sh", "bash", &[]),
    ("bash", "bash", &[]),
    ("zsh", "zsh", &[]),
    ("py", "python3", &[]),
    ("rb", "ruby", &[]),
    ("pl", "perl", &[]),
    ("php", "php", &[]),
    ("js", "osascript", &["-l", "JavaScript"]),
    ("applescript", "osascript", &[]),
    ("scpt", "osascript", &[]),
];

/// Sidecar images share a stem with their script and are never actions.
const IMAGE_EXTENSIONS: &[&str] = &["png", "icns", "jpg", "jpeg", "gif"];

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn image_extensions() -> &'static [&'static str] {
    IMAGE_EXTENSIONS
}

/// Interpreter for `path`'s extension, if one is known.
pub fn interpreter_for(path: &Path) -> Option<(&'static str, &'static [&'static str])> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    INTERPRETERS
        .iter()
        .find(|(e, _, _)| *e == ext)
        .map(|(_, program, args)| (*program, *args))
}

#[cfg(unix)]
pub fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub fn is_executable(_metadata: &Metadata) -> bool {
    false
}

/// Whether discovery should treat `path` as an action.
pub fn is_runnable(path: &Path, metadata: &Metadata) -> bool {
    if !metadata.is_file() || is_image(path) {
        return false;
    }
    is_executable(metadata) || interpreter_for(path).is_some()
}

/// Build the base command for running `path`. Callers add arguments.
pub fn command_for(path: &Path) -> Command {
    let executable = std::fs::metadata(path)
        .map(|m| is_executable(&m))
        .unwrap_or(false);

    if !executable {
        if let Some((program, args)) = interpreter_for(path) {
            let program = find_executable(program)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| program.to_string());
            let mut cmd = Command::new(program);
            cmd.args(args).arg(path);
            return cmd;
        }
    }

    Command::new(path)
}

/// Find an executable, checking common locations that launcher-spawned
/// processes miss before falling back to PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let common_paths = [
        dirs::home_dir().map(|h| h.join(".local/bin")),
        dirs::home_dir().map(|h| h.join("bin")),
        Some(PathBuf::from("/opt/homebrew/bin")),
        Some(PathBuf::from("/usr/local/bin")),
        Some(PathBuf::from("/usr/bin")),
        Some(PathBuf::from("/bin")),
    ];

    for dir in common_paths.iter().flatten() {
        let candidate = dir.join(name);
        if candidate.is_file() {
            debug!(name, path = %candidate.display(), "Found executable");
            return Some(candidate);
        }
    }

    match which::which(name) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!(name, error = %e, "Executable not found");
            None
        }
    }
}
