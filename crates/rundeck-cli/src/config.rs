//! Connection settings loaded from the JSON config file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::{CliError, CliResult};

const DEFAULT_SCHEME: &str = "https";
const DEFAULT_CONFIG_RELATIVE: &str = ".config/rundeck-cli/conf.json";

/// Contents of `conf.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Conf {
    pub(crate) host: String,
    pub(crate) project: String,
    #[serde(default = "default_scheme")]
    pub(crate) scheme: String,
    #[serde(default)]
    pub(crate) token: Option<String>,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

impl Conf {
    /// Read and validate the config file at `path`.
    pub(crate) fn load(path: &Path) -> CliResult<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map_err(CliError::failure)?;
        let conf: Self = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid config file", path.display()))
            .map_err(CliError::failure)?;
        conf.validate()?;
        Ok(conf)
    }

    fn validate(&self) -> CliResult<()> {
        if self.host.trim().is_empty() {
            return Err(CliError::validation("config: host cannot be empty"));
        }
        if self.project.trim().is_empty() {
            return Err(CliError::validation("config: project cannot be empty"));
        }
        if self.scheme.trim().is_empty() {
            return Err(CliError::validation("config: scheme cannot be empty"));
        }
        Ok(())
    }

    /// Replace the file token with `token` when one is given.
    #[must_use]
    pub(crate) fn with_token_override(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.token = token;
        }
        self
    }

    /// Token to authenticate with; blank tokens count as absent.
    pub(crate) fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// `$HOME/.config/rundeck-cli/conf.json`, or a relative path without `HOME`.
pub(crate) fn default_config_path() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || PathBuf::from(DEFAULT_CONFIG_RELATIVE),
        |home| PathBuf::from(home).join(DEFAULT_CONFIG_RELATIVE),
    )
}
