use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::{Strategy, DEFAULT_SUGGEST_LIMIT};
use crate::{tlog_debug, Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    /// Strategy used when a request does not name one.
    pub default_strategy: Option<Strategy>,
    /// Number of tasks returned by `suggest`.
    pub suggest_limit: Option<usize>,
    /// Log file location; `~/` is expanded.
    pub log_file: Option<String>,
}

impl Config {
    pub fn taskrank_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".taskrank"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::taskrank_dir()?.join("taskrank.toml"))
    }

    pub fn effective_strategy(&self) -> Strategy {
        self.default_strategy.unwrap_or_default()
    }

    pub fn effective_suggest_limit(&self) -> usize {
        self.suggest_limit.unwrap_or(DEFAULT_SUGGEST_LIMIT)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(expand_tilde)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        tlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            tlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        tlog_debug!(
            "Config loaded: default_strategy={:?}, suggest_limit={:?}, log_file={:?}",
            config.default_strategy,
            config.suggest_limit,
            config.log_file
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.suggest_limit == Some(0) {
            return Err(Error::Validation(
                "suggest_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
