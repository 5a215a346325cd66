//! browser-actions command line
//!
//! Thin routing layer: parse arguments, build the configuration and the
//! `Context`, call one operation, print its result. Launcher payloads go to
//! stdout, diagnostics to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, warn};

use browser_actions::blacklist::BlacklistStore;
use browser_actions::config::{
    load_config, resolve_data_dir, Config, ConfigOverrides, LOG_DIR_NAME,
};
use browser_actions::error::ResultExt;
use browser_actions::logging;
use browser_actions::{ActionError, ActionKind, Context, ErrorSeverity, Modifier, Target};

#[derive(Parser, Debug)]
#[command(name = "browser-actions")]
#[command(about = "Run pluggable tab and URL actions")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

/// Configuration overrides, applied after config.json and the environment.
#[derive(Args, Debug, Default)]
struct Settings {
    /// Directory holding the bundled scripts/ and icons/
    #[arg(long, global = true, value_name = "DIR")]
    bundled_dir: Option<PathBuf>,

    /// Directory for user scripts, the blacklist, config.json and logs
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Never run `--describe` on scripts
    #[arg(long, global = true)]
    no_probe: bool,

    /// Tab action for plain ↩ (empty to unbind)
    #[arg(long, global = true, value_name = "NAME")]
    tab_default: Option<String>,
    /// Tab action for ⌃↩
    #[arg(long, global = true, value_name = "NAME")]
    tab_ctrl: Option<String>,
    /// Tab action for ⌥↩
    #[arg(long, global = true, value_name = "NAME")]
    tab_opt: Option<String>,
    /// Tab action for fn↩
    #[arg(long, global = true, value_name = "NAME")]
    tab_fn: Option<String>,
    /// Tab action for ⇧↩
    #[arg(long, global = true, value_name = "NAME")]
    tab_shift: Option<String>,

    /// URL action for plain ↩ (empty to unbind)
    #[arg(long, global = true, value_name = "NAME")]
    url_default: Option<String>,
    /// URL action for ⌃↩
    #[arg(long, global = true, value_name = "NAME")]
    url_ctrl: Option<String>,
    /// URL action for ⌥↩
    #[arg(long, global = true, value_name = "NAME")]
    url_opt: Option<String>,
    /// URL action for fn↩
    #[arg(long, global = true, value_name = "NAME")]
    url_fn: Option<String>,
    /// URL action for ⇧↩
    #[arg(long, global = true, value_name = "NAME")]
    url_shift: Option<String>,
}

impl Settings {
    fn overrides(&self) -> ConfigOverrides {
        let slots = [
            (ActionKind::Tab, Modifier::Default, &self.tab_default),
            (ActionKind::Tab, Modifier::Ctrl, &self.tab_ctrl),
            (ActionKind::Tab, Modifier::Opt, &self.tab_opt),
            (ActionKind::Tab, Modifier::Fn, &self.tab_fn),
            (ActionKind::Tab, Modifier::Shift, &self.tab_shift),
            (ActionKind::Url, Modifier::Default, &self.url_default),
            (ActionKind::Url, Modifier::Ctrl, &self.url_ctrl),
            (ActionKind::Url, Modifier::Opt, &self.url_opt),
            (ActionKind::Url, Modifier::Fn, &self.url_fn),
            (ActionKind::Url, Modifier::Shift, &self.url_shift),
        ];

        ConfigOverrides {
            bundled_dir: self.bundled_dir.clone(),
            data_dir: self.data_dir.clone(),
            bindings: slots
                .into_iter()
                .filter_map(|(kind, modifier, name)| {
                    name.as_ref().map(|n| (kind, modifier, n.clone()))
                })
                .collect(),
            probe_descriptions: self.no_probe.then_some(false),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List actions of a kind as launcher JSON
    Actions {
        /// tab or url
        kind: ActionKind,

        /// Only show actions whose title or name contains this
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Resolve an action and run it against a target
    Action {
        #[command(subcommand)]
        target: TargetCommand,
    },
    /// Print the name of the action that would run
    Resolve {
        /// tab or url
        kind: ActionKind,

        #[command(flatten)]
        pick: Pick,
    },
    /// Add action names to the blacklist
    Blacklist {
        /// Names of scripts (without extensions)
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove action names from the blacklist
    Unblacklist {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Subcommand, Debug)]
enum TargetCommand {
    /// Run a tab action
    Tab {
        /// Window number (1-based)
        #[arg(short, long, default_value_t = 1)]
        window: u32,

        /// Tab number (1-based)
        #[arg(short, long)]
        tab: u32,

        #[command(flatten)]
        pick: Pick,
    },
    /// Run a URL action
    Url {
        #[arg(short, long)]
        url: String,

        #[command(flatten)]
        pick: Pick,
    },
}

/// Which action to run
#[derive(Args, Debug)]
struct Pick {
    /// Run this action, ignoring modifier bindings
    #[arg(short, long, value_name = "NAME")]
    action: Option<String>,

    /// Modifier held by the user: default, ctrl, opt, fn, shift
    #[arg(short, long, default_value = "default")]
    modifier: Modifier,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let env: Vec<(String, String)> = std::env::vars().collect();
    let overrides = cli.settings.overrides();

    // Only the data dir is needed for the log file; config.json may be broken
    let log_dir = resolve_data_dir(env.clone(), &overrides)
        .ok()
        .map(|dir| dir.join(LOG_DIR_NAME));
    let _guard = logging::init(log_dir.as_deref());

    match run(cli.command, env, &overrides) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Log the failure, print the user-facing text and pick the exit code.
fn report(err: &anyhow::Error) -> ExitCode {
    let Some(action_err) = err.downcast_ref::<ActionError>() else {
        error!(error = %format!("{err:#}"), "Command failed");
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    };

    let severity = action_err.severity();
    match severity {
        ErrorSeverity::Warning => warn!(error = %action_err, "Command failed"),
        ErrorSeverity::Error | ErrorSeverity::Critical => {
            error!(error = %action_err, ?severity, "Command failed")
        }
    }
    eprintln!("{}", action_err.user_message());
    ExitCode::from(exit_status(severity))
}

/// 1 for a failed operation, 2 for something the user can fix in their
/// configuration, 3 when actions could not be discovered at all.
fn exit_status(severity: ErrorSeverity) -> u8 {
    match severity {
        ErrorSeverity::Error => 1,
        ErrorSeverity::Warning => 2,
        ErrorSeverity::Critical => 3,
    }
}

fn run(
    command: Command,
    env: Vec<(String, String)>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<()> {
    let config = load_config(env, overrides)?;
    debug!(command = ?command, "Dispatching");

    match command {
        Command::Actions { kind, query } => {
            let ctx = Context::load(config)?;
            let feedback = ctx.feedback(kind, query.as_deref());
            println!("{}", feedback.to_json().context("serializing action list")?);
        }
        Command::Action { target } => {
            let (target, pick) = match target {
                TargetCommand::Tab { window, tab, pick } => (Target::tab(window, tab)?, pick),
                TargetCommand::Url { url, pick } => (Target::url(&url)?, pick),
            };
            let ctx = Context::load(config)?;
            let result = ctx.resolve_and_run(&target, pick.modifier, pick.action.as_deref())?;
            if !result.output.is_empty() {
                println!("{}", result.output);
            }
        }
        Command::Resolve { kind, pick } => {
            let ctx = Context::load(config)?;
            let action = ctx.resolve_action(kind, pick.modifier, pick.action.as_deref())?;
            println!("{}", action.name);
        }
        Command::Blacklist { names } => {
            let added = blacklist_store(&config).add(&names)?;
            println!("Blacklisted {added} action(s)");
        }
        Command::Unblacklist { names } => {
            let removed = blacklist_store(&config).remove(&names)?;
            println!("Removed {removed} action(s) from the blacklist");
        }
        Command::Config => {
            let ctx = Context::load(config)?;
            let blacklist: Vec<String> = ctx
                .blacklist()
                .log_err()
                .unwrap_or_default()
                .iter()
                .map(str::to_string)
                .collect();
            let report = serde_json::json!({
                "config": ctx.config(),
                "configFile": ctx.config().config_path(),
                "scanDirs": ctx.config().script_dirs(),
                "blacklist": blacklist,
                "actions": {
                    "tab": ctx.list_actions(ActionKind::Tab),
                    "url": ctx.list_actions(ActionKind::Url),
                },
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serializing configuration")?
            );
        }
    }
    Ok(())
}

fn blacklist_store(config: &Config) -> BlacklistStore {
    BlacklistStore::new(config.blacklist_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_follows_severity() {
        let unbound = ActionError::NoActionConfigured {
            kind: ActionKind::Url,
            modifier: Modifier::Opt,
            stale: vec![],
        };
        assert_eq!(exit_status(unbound.severity()), 2);

        let unknown = ActionError::UnknownAction {
            kind: ActionKind::Tab,
            name: "gone".to_string(),
        };
        assert_eq!(exit_status(unknown.severity()), 1);

        let discovery = ActionError::Discovery {
            path: PathBuf::from("/wf/scripts/tab"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(exit_status(discovery.severity()), 3);
    }

    #[test]
    fn settings_become_binding_overrides() {
        let cli = Cli::parse_from([
            "browser-actions",
            "--url-opt",
            "archive",
            "--tab-default",
            "",
            "--no-probe",
            "resolve",
            "url",
        ]);
        let overrides = cli.settings.overrides();
        assert_eq!(
            overrides.bindings,
            vec![
                (ActionKind::Tab, Modifier::Default, String::new()),
                (ActionKind::Url, Modifier::Opt, "archive".to_string()),
            ]
        );
        assert_eq!(overrides.probe_descriptions, Some(false));
    }
}
