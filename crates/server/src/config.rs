//! Configuration file support for universal-skills.
//!
//! Loads settings from `~/.universal-skills/config.toml` (or the file named by
//! `UNIVERSAL_SKILLS_CONFIG`) with the following precedence:
//! CLI arguments > Environment variables > Config file
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.universal-skills/config.toml
//!
//! [serve]
//! # Milliseconds between scheduled re-scans of the skill locations
//! refresh_interval_ms = 30000
//!
//! # Extra skill directories, searched after the standard locations
//! skill_dirs = ["/opt/team-skills", "~/work/skills"]
//!
//! [install]
//! # Where `universal-skills install` puts skills by default
//! local_dir = "~/.claude/skills"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub(crate) const ENV_CONFIG: &str = "UNIVERSAL_SKILLS_CONFIG";
/// Colon-separated extra skill directories.
pub(crate) const ENV_SKILL_DIR: &str = "UNIVERSAL_SKILLS_SKILL_DIR";
/// Refresh period in milliseconds.
pub(crate) const ENV_REFRESH_MS: &str = "UNIVERSAL_SKILLS_REFRESH_MS";
/// Default install directory.
pub(crate) const ENV_INSTALL_DIR: &str = "UNIVERSAL_SKILLS_INSTALL_DIR";

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Serve command configuration.
    #[serde(default)]
    pub serve: ServeConfig,
    /// Install command configuration.
    #[serde(default)]
    pub install: InstallConfig,
}

/// Configuration for the serve command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Milliseconds between scheduled refreshes.
    pub refresh_interval_ms: Option<u64>,
    /// Extra skill directories.
    #[serde(default)]
    pub skill_dirs: Vec<String>,
}

/// Configuration for the install command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallConfig {
    /// Default installation directory.
    pub local_dir: Option<String>,
}

/// Returns the path to the config file.
fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(ENV_CONFIG).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|h| h.join(".universal-skills").join("config.toml"))
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config() -> Result<Option<Config>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    tracing::debug!(
        target: "universal_skills::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Applies configuration file settings to environment variables.
///
/// Only sets environment variables that are not already set, preserving
/// the precedence: CLI > ENV > config file. Must run before CLI parsing.
pub fn apply_config_to_env() {
    match load_config() {
        Ok(Some(config)) => apply_loaded_config(&config),
        Ok(None) => {}
        Err(err) => tracing::warn!(
            target: "universal_skills::config",
            error = %format!("{err:#}"),
            "ignoring unusable configuration file"
        ),
    }
}

fn apply_loaded_config(config: &Config) {
    fn set_if_absent(key: &str, value: &str) {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
            tracing::trace!(
                target: "universal_skills::config",
                key,
                "Set environment variable from config file"
            );
        }
    }

    if let Some(ms) = config.serve.refresh_interval_ms {
        set_if_absent(ENV_REFRESH_MS, &ms.to_string());
    }
    if !config.serve.skill_dirs.is_empty() {
        let joined = config
            .serve
            .skill_dirs
            .iter()
            .map(|d| shellexpand::tilde(d).into_owned())
            .collect::<Vec<_>>()
            .join(":");
        set_if_absent(ENV_SKILL_DIR, &joined);
    }
    if let Some(dir) = &config.install.local_dir {
        set_if_absent(ENV_INSTALL_DIR, dir);
    }
}
