//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dirtree/dirtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `DIRTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::ConflictPolicy;
use crate::application::template::placeholder_key;
use crate::application::{ApplicationError, Placeholders};
use crate::domain::{NodeDefaults, DEFAULT_ICON};

/// Unified configuration for dirtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Icon for directories that declare none
    pub default_icon: String,
    /// README template file (default: built-in template)
    pub template: Option<PathBuf>,
    /// Behavior of `export` when the target file exists
    pub conflict_policy: ConflictPolicy,
    /// Default depth limit for `show`
    pub max_depth: Option<usize>,
    /// Extra README placeholders, e.g. `AUTHOR = "me"` fills `[AUTHOR]`
    pub placeholders: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_icon: DEFAULT_ICON.to_string(),
            template: None,
            conflict_policy: ConflictPolicy::default(),
            max_depth: None,
            placeholders: BTreeMap::new(),
        }
    }
}

/// Raw settings for intermediate parsing (None → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_icon: Option<String>,
    pub template: Option<PathBuf>,
    pub conflict_policy: Option<ConflictPolicy>,
    pub max_depth: Option<usize>,
    pub placeholders: BTreeMap<String, String>,
}

/// Get the XDG config directory for dirtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dirtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dirtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), config_file)
    }

    /// Load settings from an optional global file and an optional explicit file.
    ///
    /// A missing global file is skipped, a missing explicit file is an error.
    pub fn load_layers(global: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!("load: config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Scalars: overlay wins if Some. Placeholders merge key by key.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut placeholders = self.placeholders.clone();
        placeholders.extend(overlay.placeholders.clone());

        Self {
            default_icon: overlay
                .default_icon
                .clone()
                .unwrap_or_else(|| self.default_icon.clone()),
            template: overlay.template.clone().or_else(|| self.template.clone()),
            conflict_policy: overlay.conflict_policy.unwrap_or(self.conflict_policy),
            max_depth: overlay.max_depth.or(self.max_depth),
            placeholders,
        }
    }

    /// Apply DIRTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DIRTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_icon") {
            settings.default_icon = val;
        }
        if let Ok(val) = config.get_string("template") {
            settings.template = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("conflict_policy") {
            settings.conflict_policy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = Some(usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("max_depth must not be negative: {val}"),
            })?);
        }

        Ok(settings)
    }

    /// Expand `~` and `$VAR` in the template path.
    fn expand_paths(&mut self) {
        if let Some(template) = &self.template {
            let raw = template.to_string_lossy();
            let expanded = shellexpand::full(&raw)
                .map(|p| p.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.template = Some(PathBuf::from(expanded));
        }
    }

    pub fn node_defaults(&self) -> NodeDefaults {
        NodeDefaults {
            icon: self.default_icon.clone(),
        }
    }

    /// Configured placeholders keyed by their bracketed form.
    pub fn placeholders(&self) -> Placeholders {
        self.placeholders
            .iter()
            .map(|(k, v)| (placeholder_key(k), Some(v.clone())))
            .collect()
    }

    /// Render settings as TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
