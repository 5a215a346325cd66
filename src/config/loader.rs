//! Configuration loading
//!
//! Layers, later wins:
//! 1. built-in defaults
//! 2. `<data_dir>/config.json`
//! 3. environment variables (`BROWSER_ACTIONS_*`)
//! 4. command-line overrides
//!
//! The data dir itself comes from layers 1, 3 and 4 only, since it decides
//! where the config file is.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::actions::ActionKind;
use crate::error::{ActionError, Result};
use crate::shortcuts::Modifier;

use super::binding_env_var;
use super::defaults::*;
use super::types::{Config, ConfigFile, ConfigOverrides};

/// Build the effective configuration.
///
/// `env` is usually `std::env::vars()`; tests pass their own pairs.
#[instrument(name = "load_config", skip_all)]
pub fn load_config<I>(env: I, overrides: &ConfigOverrides) -> Result<Config>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env = prefixed_env(env);
    let env_value = |key: &str| non_empty(&env, key);

    let data_dir = data_dir_from(&env, overrides)?;

    let config_path = data_dir.join(CONFIG_FILE_NAME);
    let file = read_config_file(&config_path)?.unwrap_or_default();

    let bundled_dir = match overrides.bundled_dir.clone() {
        Some(dir) => dir,
        None => match env_value(ENV_BUNDLED_DIR).or(file.bundled_dir.as_deref()) {
            Some(dir) => expand_path(dir),
            None => default_bundled_dir()?,
        },
    };

    let mut config = Config::new(bundled_dir, data_dir);
    config.tab = file.tab;
    config.url = file.url;
    config.probe_descriptions = file
        .probe_descriptions
        .unwrap_or(DEFAULT_PROBE_DESCRIPTIONS);

    for kind in ActionKind::ALL {
        for modifier in Modifier::ALL {
            // Present but empty unbinds
            if let Some(value) = env.get(&binding_env_var(kind, modifier)) {
                config.bindings_mut(kind).set(modifier, Some(value.clone()));
            }
        }
    }
    if let Some(value) = env_value(ENV_PROBE_DESCRIPTIONS) {
        config.probe_descriptions = parse_bool(ENV_PROBE_DESCRIPTIONS, value)?;
    }

    for (kind, modifier, name) in &overrides.bindings {
        config
            .bindings_mut(*kind)
            .set(*modifier, Some(name.clone()));
    }
    if let Some(probe) = overrides.probe_descriptions {
        config.probe_descriptions = probe;
    }

    info!(
        bundled_dir = %config.bundled_dir.display(),
        data_dir = %config.data_dir.display(),
        tab_bindings = config.tab.iter().count(),
        url_bindings = config.url.iter().count(),
        "Configuration loaded"
    );
    Ok(config)
}

/// The user data directory, resolved without reading `config.json`.
///
/// Lets logging start before the rest of the configuration is loaded.
pub fn resolve_data_dir<I>(env: I, overrides: &ConfigOverrides) -> Result<PathBuf>
where
    I: IntoIterator<Item = (String, String)>,
{
    data_dir_from(&prefixed_env(env), overrides)
}

fn data_dir_from(env: &HashMap<String, String>, overrides: &ConfigOverrides) -> Result<PathBuf> {
    if let Some(dir) = &overrides.data_dir {
        return Ok(dir.clone());
    }
    match non_empty(env, ENV_DATA_DIR) {
        Some(dir) => Ok(expand_path(dir)),
        None => default_data_dir(),
    }
}

fn prefixed_env<I>(env: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    env.into_iter()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse `config.json`. A missing file is `None`, a malformed one an error.
pub fn read_config_file(path: &Path) -> Result<Option<ConfigFile>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(None);
        }
        Err(e) => {
            return Err(ActionError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str::<ConfigFile>(&content)
        .map(Some)
        .map_err(|e| ActionError::Config(format!("invalid {}: {}", path.display(), e)))
}

fn expand_path(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).as_ref())
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            ActionError::Config(format!(
                "cannot determine a data directory; set {ENV_DATA_DIR}"
            ))
        })
}

/// Directory containing the running executable.
fn default_bundled_dir() -> Result<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .ok_or_else(|| {
            ActionError::Config(format!(
                "cannot locate the executable's directory; set {ENV_BUNDLED_DIR}"
            ))
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ActionError::Config(format!(
            "{key} must be true or false, got '{value}'"
        ))),
    }
}
