use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

use crate::actions::ActionKind;
use crate::shortcuts::Modifier;

/// Error severity for launcher display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning, // recoverable, the user can fix configuration
    Error,   // the requested operation failed
    Critical, // the whole invocation is aborted
}

/// Domain-specific errors for the action core
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("cannot scan action directory '{}': {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown {kind} action: {name}")]
    UnknownAction { kind: ActionKind, name: String },

    #[error("no {kind} action configured for modifier '{modifier}'")]
    NoActionConfigured {
        kind: ActionKind,
        modifier: Modifier,
        /// Bindings that were configured but did not resolve, by slot.
        stale: Vec<(Modifier, String)>,
    },

    #[error("action '{name}' failed on {target}: {detail}")]
    Execution {
        name: String,
        target: String,
        exit_code: Option<i32>,
        detail: String,
        diagnostics: String,
    },

    #[error("action '{name}' is a {kind} action and cannot run on {target}")]
    TargetMismatch {
        name: String,
        kind: ActionKind,
        target: String,
    },

    #[error("invalid action name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("blacklist '{}': {source}", path.display())]
    Blacklist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ActionError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Discovery { .. } => ErrorSeverity::Critical,
            Self::UnknownAction { .. } => ErrorSeverity::Error,
            Self::NoActionConfigured { .. } => ErrorSeverity::Warning,
            Self::Execution { .. } => ErrorSeverity::Error,
            Self::TargetMismatch { .. } => ErrorSeverity::Error,
            Self::InvalidName { .. } => ErrorSeverity::Warning,
            Self::InvalidTarget(_) => ErrorSeverity::Error,
            Self::Blacklist { .. } => ErrorSeverity::Error,
            Self::Config(_) => ErrorSeverity::Warning,
        }
    }

    /// Text shown to the user by the launcher.
    pub fn user_message(&self) -> String {
        match self {
            Self::Discovery { path, source } => {
                format!("Could not read actions in {}: {}", path.display(), source)
            }
            Self::UnknownAction { kind, name } => {
                format!("No {} action named \"{}\" is installed", kind, name)
            }
            Self::NoActionConfigured {
                kind,
                modifier,
                stale,
            } => {
                if stale.is_empty() {
                    format!(
                        "No {} action is set for {}. Set {} to an action name.",
                        kind,
                        modifier.label(),
                        crate::config::binding_env_var(*kind, *modifier)
                    )
                } else {
                    let names: Vec<&str> = stale.iter().map(|(_, name)| name.as_str()).collect();
                    let vars: Vec<String> = stale
                        .iter()
                        .map(|(slot, _)| crate::config::binding_env_var(*kind, *slot))
                        .collect();
                    format!(
                        "No usable {} action for {}: {} not installed or blacklisted. Check {}.",
                        kind,
                        modifier.label(),
                        names.join(", "),
                        vars.join(" and ")
                    )
                }
            }
            Self::Execution {
                name,
                detail,
                diagnostics,
                ..
            } => {
                if diagnostics.is_empty() {
                    format!("Action \"{}\" failed: {}", name, detail)
                } else {
                    format!("Action \"{}\" failed: {}\n{}", name, detail, diagnostics)
                }
            }
            Self::TargetMismatch { name, kind, .. } => {
                format!("\"{}\" is a {} action", name, kind)
            }
            Self::InvalidName { name, reason } => {
                format!("\"{}\" cannot be blacklisted: {}", name.escape_debug(), reason)
            }
            Self::InvalidTarget(msg) => format!("Invalid target: {}", msg),
            Self::Blacklist { path, source } => {
                format!("Could not update blacklist {}: {}", path.display(), source)
            }
            Self::Config(msg) => format!("Configuration issue: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ActionError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
