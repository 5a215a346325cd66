//! Action execution
//!
//! Runs one action script against one target and translates the outcome:
//! - exit 0: `RunResult` with captured stdout
//! - non-zero exit, signal, or launch failure: `ActionError::Execution`
//!
//! There is no retry and no timeout. Scripts may have side effects, so the
//! caller decides whether running again is safe.
//!
//! ## Invocation contract
//!
//! | kind | arguments          | environment                                      |
//! |------|--------------------|--------------------------------------------------|
//! | tab  | `<window> <tab>`   | `BROWSER_ACTIONS_WINDOW`, `BROWSER_ACTIONS_TAB`  |
//! | url  | `<url>`            | `BROWSER_ACTIONS_URL`                            |
//!
//! Both kinds also get `BROWSER_ACTIONS_ACTION` (the action name) and
//! `BROWSER_ACTIONS_KIND` (`tab` or `url`). Indices are 1-based.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::actions::{ActionDescriptor, ActionKind, Target};
use crate::error::{ActionError, Result};

use super::interpreter::command_for;
use super::stderr_buffer::StderrBuffer;

pub const ENV_ACTION: &str = "BROWSER_ACTIONS_ACTION";
pub const ENV_KIND: &str = "BROWSER_ACTIONS_KIND";
pub const ENV_WINDOW: &str = "BROWSER_ACTIONS_WINDOW";
pub const ENV_TAB: &str = "BROWSER_ACTIONS_TAB";
pub const ENV_URL: &str = "BROWSER_ACTIONS_URL";

/// Outcome of a successful action run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub name: String,
    pub kind: ActionKind,
    /// Stdout with the trailing newline removed; empty for side-effect-only actions
    pub output: String,
    pub exit_code: i32,
    pub duration: Duration,
}

/// Build the full command for `action` against `target`.
pub fn build_command(action: &ActionDescriptor, target: &Target) -> Command {
    let mut cmd = command_for(&action.path);
    cmd.args(target.args())
        .env(ENV_ACTION, &action.name)
        .env(ENV_KIND, action.kind.dir_name())
        .stdin(Stdio::null());

    match target {
        Target::Tab { window, tab } => {
            cmd.env(ENV_WINDOW, window.to_string())
                .env(ENV_TAB, tab.to_string());
        }
        Target::Url(url) => {
            cmd.env(ENV_URL, url.as_str());
        }
    }
    cmd
}

/// Run `action` once against `target`, blocking until it exits.
#[instrument(level = "debug", skip_all, fields(action = %action.name, target = %target))]
pub fn run_action(action: &ActionDescriptor, target: &Target) -> Result<RunResult> {
    if target.kind() != action.kind {
        return Err(ActionError::TargetMismatch {
            name: action.name.clone(),
            kind: action.kind,
            target: target.to_string(),
        });
    }

    let start = Instant::now();
    debug!(path = %action.path.display(), args = ?target.args(), "Running action");

    let output = build_command(action, target).output().map_err(|e| {
        warn!(error = %e, path = %action.path.display(), "Action could not be launched");
        ActionError::Execution {
            name: action.name.clone(),
            target: target.to_string(),
            exit_code: None,
            detail: format!("could not launch {}: {}", action.path.display(), e),
            diagnostics: String::new(),
        }
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout)
        .trim_end_matches(['\r', '\n'])
        .to_string();

    if output.status.success() {
        info!(
            exit_code = 0,
            duration_ms = duration.as_millis() as u64,
            output_bytes = stdout.len(),
            "Action completed"
        );
        return Ok(RunResult {
            name: action.name.clone(),
            kind: action.kind,
            output: stdout,
            exit_code: 0,
            duration,
        });
    }

    let mut diagnostics = StderrBuffer::from_output(&output.stderr);
    if diagnostics.is_empty() {
        diagnostics = StderrBuffer::from_output(&output.stdout);
    }

    let exit_code = output.status.code();
    let detail = match exit_code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by a signal".to_string(),
    };

    warn!(
        exit_code = ?exit_code,
        duration_ms = duration.as_millis() as u64,
        stderr = %diagnostics.contents(),
        "Action failed"
    );

    Err(ActionError::Execution {
        name: action.name.clone(),
        target: target.to_string(),
        exit_code,
        detail,
        diagnostics: diagnostics.contents(),
    })
}
