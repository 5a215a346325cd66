//! Per-invocation state shared by every operation.
//!
//! Built once at startup: configuration is resolved, user directories are
//! created, the blacklist is loaded and the script directories are scanned.
//! Nothing here changes afterwards; blacklist edits take effect on the next
//! invocation.

use tracing::{info, instrument};

use crate::actions::{ActionDescriptor, ActionKind, Registry, ScriptScanner, Target};
use crate::blacklist::{Blacklist, BlacklistStore};
use crate::config::Config;
use crate::error::Result;
use crate::executor::{self, RunResult};
use crate::feedback::Feedback;
use crate::shortcuts::{Modifier, Resolver};

pub struct Context {
    config: Config,
    blacklist_store: BlacklistStore,
    registry: Registry,
}

impl Context {
    /// Discover actions for `config`.
    #[instrument(level = "debug", skip_all)]
    pub fn load(config: Config) -> Result<Self> {
        config.ensure_user_dirs()?;

        let blacklist_store = BlacklistStore::new(config.blacklist_path());
        let blacklist = blacklist_store.load()?;

        let scanner = ScriptScanner::new(&config.bundled_dir)
            .with_blacklist(blacklist)
            .with_probe(config.probe_descriptions);
        let registry = Registry::build(&scanner, &config.script_dirs())?;

        Ok(Context {
            config,
            blacklist_store,
            registry,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current on-disk blacklist, which may differ from the one used at load.
    pub fn blacklist(&self) -> Result<Blacklist> {
        self.blacklist_store.load()
    }

    /// Usable actions of `kind` in discovery order.
    pub fn list_actions(&self, kind: ActionKind) -> &[ActionDescriptor] {
        self.registry.all(kind)
    }

    /// Launcher items for `kind`, optionally filtered by `query`.
    pub fn feedback(&self, kind: ActionKind, query: Option<&str>) -> Feedback {
        Feedback::for_actions(self.list_actions(kind), query, &self.config.bundled_dir)
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.config.tab, &self.config.url)
    }

    pub fn resolve_action(
        &self,
        kind: ActionKind,
        modifier: Modifier,
        explicit: Option<&str>,
    ) -> Result<&ActionDescriptor> {
        self.resolver().resolve(kind, modifier, explicit)
    }

    pub fn run_action(&self, action: &ActionDescriptor, target: &Target) -> Result<RunResult> {
        executor::run_action(action, target)
    }

    /// Resolve for the target's kind, then run once.
    pub fn resolve_and_run(
        &self,
        target: &Target,
        modifier: Modifier,
        explicit: Option<&str>,
    ) -> Result<RunResult> {
        let (action, source) =
            self.resolver()
                .resolve_with_source(target.kind(), modifier, explicit)?;
        info!(
            name = %action.name,
            kind = %action.kind,
            modifier = %modifier,
            source = ?source,
            "Running resolved action"
        );
        self.run_action(action, target)
    }

    pub fn add_to_blacklist<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist_store.add(names)
    }

    pub fn remove_from_blacklist<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist_store.remove(names)
    }
}
