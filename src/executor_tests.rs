use super::*;
use crate::actions::{ActionDescriptor, ActionKind, Target};
use crate::error::ActionError;
use std::path::{Path, PathBuf};

/// Write a bash script. Left non-executable so it runs through the
/// interpreter rather than being exec'd while another test thread forks.
fn write_script(dir: &Path, file_name: &str, body: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, format!("#!/bin/bash\n{body}\n")).unwrap();
    path
}

fn descriptor(name: &str, kind: ActionKind, path: PathBuf) -> ActionDescriptor {
    ActionDescriptor {
        name: name.to_string(),
        title: name.to_string(),
        icon: PathBuf::from(kind.default_icon()),
        kind,
        path,
        enabled: true,
    }
}

#[cfg(unix)]
#[test]
fn test_url_action_receives_url_as_sole_argument() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo-url.sh", r#"echo "$# $1 $BROWSER_ACTIONS_URL""#);
    let action = descriptor("echo-url", ActionKind::Url, script);
    let target = Target::url("https://example.com/path?q=1").unwrap();

    let result = run_action(&action, &target).unwrap();

    assert_eq!(
        result.output,
        "1 https://example.com/path?q=1 https://example.com/path?q=1"
    );
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.kind, ActionKind::Url);
}

#[cfg(unix)]
#[test]
fn test_tab_action_receives_window_and_tab() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "coords.sh",
        r#"echo "$1/$2 $BROWSER_ACTIONS_WINDOW/$BROWSER_ACTIONS_TAB $BROWSER_ACTIONS_ACTION $BROWSER_ACTIONS_KIND""#,
    );
    let action = descriptor("coords", ActionKind::Tab, script);

    let result = run_action(&action, &Target::tab(2, 7).unwrap()).unwrap();

    assert_eq!(result.output, "2/7 2/7 coords tab");
}

#[cfg(unix)]
#[test]
fn test_non_zero_exit_carries_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "fail.sh", "echo 'it broke' >&2\nexit 1");
    let action = descriptor("fail", ActionKind::Url, script);

    let err = run_action(&action, &Target::url("https://example.com").unwrap()).unwrap_err();

    match err {
        ActionError::Execution {
            name,
            exit_code,
            diagnostics,
            target,
            ..
        } => {
            assert_eq!(name, "fail");
            assert_eq!(exit_code, Some(1));
            assert_eq!(diagnostics, "it broke");
            assert_eq!(target, "https://example.com/");
        }
        other => panic!("Expected Execution error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_stdout_used_as_diagnostics_when_stderr_empty() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "quiet.sh", "echo 'only stdout'\nexit 3");
    let action = descriptor("quiet", ActionKind::Tab, script);

    let err = run_action(&action, &Target::tab(1, 1).unwrap()).unwrap_err();

    match err {
        ActionError::Execution {
            exit_code,
            diagnostics,
            ..
        } => {
            assert_eq!(exit_code, Some(3));
            assert_eq!(diagnostics, "only stdout");
        }
        other => panic!("Expected Execution error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn test_failed_action_runs_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("count.txt");
    let script = write_script(
        dir.path(),
        "count.sh",
        &format!("echo run >> '{}'\nexit 1", counter.display()),
    );
    let action = descriptor("count", ActionKind::Url, script);

    assert!(run_action(&action, &Target::url("https://example.com").unwrap()).is_err());

    let runs = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(runs.lines().count(), 1);
}

#[test]
fn test_missing_script_is_execution_error() {
    let action = descriptor(
        "ghost",
        ActionKind::Url,
        PathBuf::from("/nonexistent/browser-actions/ghost"),
    );

    let err = run_action(&action, &Target::url("https://example.com").unwrap()).unwrap_err();

    match err {
        ActionError::Execution {
            exit_code, detail, ..
        } => {
            assert_eq!(exit_code, None);
            assert!(detail.contains("could not launch"), "{detail}");
        }
        other => panic!("Expected Execution error, got {other:?}"),
    }
}

#[test]
fn test_target_kind_must_match_action() {
    let action = descriptor("close", ActionKind::Tab, PathBuf::from("/x/close.sh"));
    let err = run_action(&action, &Target::url("https://example.com").unwrap()).unwrap_err();
    assert!(matches!(err, ActionError::TargetMismatch { .. }));
}

#[test]
fn test_build_command_sets_url_env() {
    let action = descriptor("open", ActionKind::Url, PathBuf::from("/x/open.py"));
    let cmd = build_command(&action, &Target::url("https://example.com").unwrap());

    let envs: Vec<_> = cmd
        .get_envs()
        .filter_map(|(k, v)| Some((k.to_str()?.to_string(), v?.to_str()?.to_string())))
        .collect();
    assert!(envs.contains(&(ENV_URL.to_string(), "https://example.com/".to_string())));
    assert!(envs.contains(&(ENV_KIND.to_string(), "url".to_string())));
    assert!(envs.iter().all(|(k, _)| k != ENV_WINDOW && k != ENV_TAB));

    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(args.last().map(String::as_str), Some("https://example.com/"));
}
