//! Error types for sqlsh.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// The main error type for sqlsh operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a driver error.
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Driver(message.into()))
    }

    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: &Path, source: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.display().to_string(),
            message: source.to_string(),
        })
    }

    /// Creates an unknown driver error.
    #[must_use]
    pub fn unknown_driver(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownDriver(name.into()))
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidUrl(url.into()))
    }

    /// Creates a bind error for a placeholder/parameter count mismatch.
    #[must_use]
    pub fn bind_mismatch(placeholders: usize, params: usize) -> Self {
        Self::new(ErrorKind::BindMismatch {
            placeholders,
            params,
        })
    }

    /// Returns true if this error came from a database driver.
    #[must_use]
    pub const fn is_driver(&self) -> bool {
        matches!(self.kind, ErrorKind::Driver(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Error reported by a database driver.
    #[error("{0}")]
    Driver(String),

    /// No registered driver matches the requested name.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// Driver URL could not be parsed.
    #[error("invalid driver url '{0}': expected [dbi:]Driver:datasource")]
    InvalidUrl(String),

    /// File could not be opened, read, or written.
    #[error("{path}: {message}")]
    Io {
        /// The file involved.
        path: String,
        /// Description of the failure.
        message: String,
    },

    /// Number of placeholders does not match number of parameters.
    #[error("bind mismatch: {placeholders} placeholders, {params} parameters")]
    BindMismatch {
        /// Placeholders found in the statement.
        placeholders: usize,
        /// Parameters supplied.
        params: usize,
    },

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Terminal line editor failed.
    #[error("editor error: {0}")]
    Editor(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Statement or file that was being processed.
    pub source: Option<String>,
    /// Driver-side trace frames, innermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            writeln!(f, "while executing: {source}")?;
        }
        for frame in &self.stack {
            writeln!(f, "  in {frame}")?;
        }
        Ok(())
    }
}

/// Result type alias using sqlsh's Error.
pub type Result<T> = std::result::Result<T, Error>;
