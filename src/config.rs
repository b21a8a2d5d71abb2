//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/modelctl/modelctl.toml`
//! 3. Environment variables: `MODELCTL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Pinned llama.cpp release providing `llama-gguf-split`.
pub const LLAMA_CPP_VERSION: &str = "b4589";

/// Name of the external GGUF merge tool.
pub const MERGE_TOOL: &str = "llama-gguf-split";

/// Environment variable holding the Ollama user identity.
pub const USER_ENV_VAR: &str = "MODELCTL_USER";

/// Environment variable overriding the external-binaries directory.
pub const BIN_DIR_ENV_VAR: &str = "MODELCTL_BIN_DIR";

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub ollama_bin: Option<String>,
}

/// Unified configuration for modelctl, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Ollama user identity, prefix of imported model names
    pub user: Option<String>,
    /// Base data directory (default: platform user-data dir)
    pub data_dir: PathBuf,
    /// Directory holding external binaries (default: derived from data_dir)
    pub bin_dir: Option<PathBuf>,
    /// Ollama executable (default: "ollama" on PATH)
    pub ollama_bin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user: None,
            data_dir: default_data_dir(),
            bin_dir: None,
            ollama_bin: "ollama".into(),
        }
    }
}

/// Get the default data directory (`~/.local/share/modelctl` on Linux).
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "modelctl")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/modelctl"))
}

/// Get the XDG config directory for modelctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "modelctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("modelctl.toml"))
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

impl Settings {
    /// Load settings with layered precedence from the process environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), None)
    }

    /// Load settings from an explicit config file and environment source.
    ///
    /// `env` replaces the process environment when given (used by tests).
    pub fn load_from(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                debug!("loading config file {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current, env)?;
        current.expand_paths();

        Ok(current)
    }

    /// Overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            user: overlay.user.clone().or_else(|| self.user.clone()),
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            bin_dir: overlay.bin_dir.clone().or_else(|| self.bin_dir.clone()),
            ollama_bin: overlay
                .ollama_bin
                .clone()
                .unwrap_or_else(|| self.ollama_bin.clone()),
        }
    }

    /// Apply MODELCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("MODELCTL").source(env))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("user") {
            settings.user = Some(val);
        }
        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("bin_dir") {
            settings.bin_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("ollama_bin") {
            settings.ollama_bin = val;
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = PathBuf::from(expand_env_vars(&self.data_dir.to_string_lossy()));
        self.bin_dir = self
            .bin_dir
            .as_ref()
            .map(|dir| PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        self.ollama_bin = expand_env_vars(&self.ollama_bin);
    }

    /// Non-empty user identity, if configured.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Installation directory of the pinned llama.cpp release.
    pub fn install_dir(&self) -> PathBuf {
        self.data_dir.join("llama.cpp").join(LLAMA_CPP_VERSION)
    }

    /// Directory holding external binaries.
    pub fn bin_dir(&self) -> PathBuf {
        self.bin_dir
            .clone()
            .unwrap_or_else(|| self.install_dir().join("build").join("bin"))
    }

    /// Resolved path of the merge tool.
    pub fn merge_tool(&self) -> PathBuf {
        self.bin_dir().join(MERGE_TOOL)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
