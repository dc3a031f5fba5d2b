//! Per-run shell state.
//!
//! A [`Session`] owns the database connection together with everything the
//! meta-commands can change: autocommit mode, the echo file, the input
//! redirection, the page length, and the cached table names.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::Path;

use sqlsh_driver::Connection;
use sqlsh_foundation::{Error, Result};
use tracing::{debug, warn};

use crate::input::Redirect;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_LENGTH: usize = 37;

/// Autocommit mode as far as the shell knows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Autocommit {
    /// The driver did not report a mode and none was set.
    #[default]
    Unknown,
    /// Every statement commits on its own.
    On,
    /// Statements run in an explicit transaction.
    Off,
}

impl From<Option<bool>> for Autocommit {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::On,
            Some(false) => Self::Off,
            None => Self::Unknown,
        }
    }
}

/// State of one shell run.
pub struct Session {
    connection: Box<dyn Connection>,
    autocommit: Autocommit,
    echo: Option<Box<dyn Write>>,
    input: Option<Redirect>,
    page_length: usize,
    tables: BTreeSet<String>,
}

impl Session {
    /// Creates a session around an open connection.
    ///
    /// The autocommit mode starts as whatever the driver reports.
    #[must_use]
    pub fn new(connection: Box<dyn Connection>) -> Self {
        let autocommit = Autocommit::from(connection.autocommit());
        Self {
            connection,
            autocommit,
            echo: None,
            input: None,
            page_length: DEFAULT_PAGE_LENGTH,
            tables: BTreeSet::new(),
        }
    }

    /// The connection.
    pub fn connection_mut(&mut self) -> &mut dyn Connection {
        self.connection.as_mut()
    }

    /// Current autocommit mode.
    #[must_use]
    pub const fn autocommit(&self) -> Autocommit {
        self.autocommit
    }

    /// Switches autocommit. The driver is told first; on failure the session
    /// keeps its previous mode.
    ///
    /// # Errors
    ///
    /// Returns the driver error.
    pub fn set_autocommit(&mut self, on: bool) -> Result<()> {
        self.connection.set_autocommit(on)?;
        self.autocommit = if on { Autocommit::On } else { Autocommit::Off };
        Ok(())
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_length(&self) -> usize {
        self.page_length
    }

    /// Sets the page length; non-positive values select the default.
    pub fn set_page_length(&mut self, requested: i64) -> usize {
        self.page_length = usize::try_from(requested)
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_LENGTH);
        self.page_length
    }

    /// Opens `path` (truncating) as the echo file. On failure the previous
    /// echo file stays active.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn open_echo(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, &e))?;
        debug!(path = %path.display(), "echo file opened");
        self.echo = Some(Box::new(LineWriter::new(file)));
        Ok(())
    }

    /// Installs an arbitrary writer as the echo sink.
    pub fn set_echo(&mut self, sink: Box<dyn Write>) {
        self.echo = Some(sink);
    }

    /// Closes the echo file, if any.
    pub fn close_echo(&mut self) {
        if let Some(mut sink) = self.echo.take() {
            if let Err(e) = sink.flush() {
                warn!(error = %e, "flushing echo file failed");
            }
        }
    }

    /// Returns true if an echo sink is installed.
    #[must_use]
    pub fn is_echoing(&self) -> bool {
        self.echo.is_some()
    }

    /// Writes one consumed input line to the echo sink.
    pub fn echo_line(&mut self, line: &str) {
        if let Some(sink) = self.echo.as_mut() {
            if let Err(e) = writeln!(sink, "{line}") {
                warn!(error = %e, "writing echo file failed");
            }
        }
    }

    /// Replaces the input redirection.
    pub fn set_input(&mut self, redirect: Redirect) {
        debug!(name = redirect.name(), "input redirected");
        self.input = Some(redirect);
    }

    /// Name of the active input redirection.
    #[must_use]
    pub fn input_name(&self) -> Option<&str> {
        self.input.as_ref().map(Redirect::name)
    }

    /// Reads the next line from the input redirection.
    ///
    /// Returns `None` when there is no redirection. Exhaustion and read
    /// errors both end the redirection.
    pub fn read_redirected_line(&mut self) -> Option<String> {
        let redirect = self.input.as_mut()?;
        match redirect.next_line() {
            Ok(Some(line)) => Some(line),
            Ok(None) => {
                debug!(name = redirect.name(), "input redirection exhausted");
                self.input = None;
                None
            }
            Err(e) => {
                warn!(name = redirect.name(), error = %e, "reading redirected input failed");
                self.input = None;
                None
            }
        }
    }

    /// Cached table names.
    #[must_use]
    pub const fn tables(&self) -> &BTreeSet<String> {
        &self.tables
    }

    /// Reloads the table-name cache from the connection.
    ///
    /// # Errors
    ///
    /// Returns the driver error; the cache is left unchanged.
    pub fn refresh_tables(&mut self) -> Result<&BTreeSet<String>> {
        let names = self.connection.tables()?;
        self.tables = names.into_iter().collect();
        Ok(&self.tables)
    }

    /// Closes the connection and the echo file.
    ///
    /// # Errors
    ///
    /// Returns the driver error from closing the connection.
    pub fn disconnect(&mut self) -> Result<()> {
        self.close_echo();
        self.connection.disconnect()
    }
}
