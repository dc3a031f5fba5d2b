//! Shell configuration.
//!
//! Settings come from a TOML file, falling back to built-in defaults:
//!
//! ```toml
//! prompt = "sqlsh => "
//! continuation_prompt = "sqlsh -> "
//! page_length = 37
//! history_file = "~/.sqlsh_history"
//! history_size = 1000
//! debug = false
//! ```
//!
//! The file is read from `--config PATH` if given, otherwise from
//! `<config dir>/sqlsh/config.toml` when it exists. The `SQLSH_HISTORY`
//! environment variable overrides `history_file`; an empty value disables
//! history persistence.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sqlsh_foundation::{Error, ErrorKind, Result};
use tracing::debug;

use crate::session::DEFAULT_PAGE_LENGTH;

const HISTORY_ENV_VAR: &str = "SQLSH_HISTORY";
const DEFAULT_HISTORY_FILE: &str = ".sqlsh_history";

/// Configuration for the shell.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Prompt shown before the first line of a statement.
    pub prompt: String,

    /// Prompt shown for continuation lines.
    pub continuation_prompt: String,

    /// Rows per page when rendering tables.
    pub page_length: usize,

    /// History file; `None` uses `~/.sqlsh_history`.
    pub history_file: Option<PathBuf>,

    /// Maximum history entries kept by the line editor.
    pub history_size: usize,

    /// Print error context along with error messages.
    pub debug: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "sqlsh => ".to_string(),
            continuation_prompt: "sqlsh -> ".to_string(),
            page_length: DEFAULT_PAGE_LENGTH,
            history_file: None,
            history_size: 1000,
            debug: false,
        }
    }
}

impl ShellConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present, and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        debug!(path = %path.display(), "loading config");
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, &e))?;
        Self::from_toml(&text)
            .map_err(|e| Error::new(ErrorKind::Config(format!("{}: {e}", path.display()))))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a config error if the text is not valid configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::new(ErrorKind::Config(e.to_string())))
    }

    /// Builder method to set the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder method to set the page length.
    #[must_use]
    pub const fn with_page_length(mut self, page_length: usize) -> Self {
        self.page_length = page_length;
        self
    }

    /// Builder method to set debug output.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolves the history file, honoring `SQLSH_HISTORY`.
    #[must_use]
    pub fn history_path(&self) -> Option<PathBuf> {
        if let Ok(custom) = env::var(HISTORY_ENV_VAR) {
            if custom.is_empty() {
                return None;
            }
            return Some(PathBuf::from(custom));
        }
        self.history_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE)))
    }
}

/// `<config dir>/sqlsh/config.toml`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sqlsh").join("config.toml"))
}
