//! Statement accumulation.
//!
//! Lines come either from the line editor or from an input redirection file.
//! They are accumulated until the text forms a complete statement: a
//! backslash meta-command (always one line), or SQL whose last significant
//! token ends with `;`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use sqlsh_foundation::lexer::last_significant;
use sqlsh_foundation::{Error, Result, TokenKind};

use crate::editor::{LineEditor, ReadResult};
use crate::repl::output_error;
use crate::session::Session;

/// Primary and continuation prompts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompts {
    /// Shown before the first line of a statement.
    pub primary: String,
    /// Shown before every following line.
    pub continuation: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            primary: "sqlsh => ".to_string(),
            continuation: "sqlsh -> ".to_string(),
        }
    }
}

/// Where the lines of a statement came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Typed at the terminal.
    Interactive,
    /// Read from an input redirection file.
    Redirected,
}

/// A complete statement, trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// Statement text.
    pub text: String,
    /// Origin of the first line.
    pub origin: Origin,
}

/// Outcome of one read cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A statement is ready for dispatch.
    Statement(Statement),
    /// Ctrl+C discarded the pending text.
    Cancelled,
    /// Interactive input ended with nothing pending.
    Eof,
}

/// Text accumulated for the statement being read.
#[derive(Debug)]
struct PendingStatement {
    text: String,
    origin: Option<Origin>,
}

impl PendingStatement {
    const fn new() -> Self {
        Self {
            text: String::new(),
            origin: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push_line(&mut self, line: &str, origin: Origin) {
        self.origin.get_or_insert(origin);
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn finish(self) -> Statement {
        Statement {
            text: self.text.trim().to_string(),
            origin: self.origin.unwrap_or(Origin::Interactive),
        }
    }
}

/// Returns true if `text` is a complete statement.
#[must_use]
pub fn is_complete(text: &str) -> bool {
    if text.trim_start().starts_with('\\') {
        return true;
    }
    last_significant(text)
        .is_some_and(|token| token.kind == TokenKind::Text && token.text.ends_with(';'))
}

/// An input redirection source.
pub struct Redirect {
    name: String,
    reader: Box<dyn BufRead>,
}

impl Redirect {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::from_reader(
            path.display().to_string(),
            Box::new(BufReader::new(file)),
        ))
    }

    /// Wraps an arbitrary reader.
    #[must_use]
    pub fn from_reader(name: impl Into<String>, reader: Box<dyn BufRead>) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    /// Name shown when echoing lines.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the next line without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns the underlying read error.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(chomp(&line).to_string()))
    }
}

fn chomp(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l))
}

/// Reads lines until they form a complete statement.
///
/// Redirected lines are echoed to `out` as `<name> >> <line>`. Every accepted
/// line is also written to the session's echo sink. Blank lines are skipped.
/// End of input with text pending yields that text as the statement.
///
/// # Errors
///
/// Returns an editor error if the terminal cannot be read.
pub fn read_statement<E: LineEditor + ?Sized>(
    editor: &mut E,
    session: &mut Session,
    out: &mut dyn Write,
    prompts: &Prompts,
) -> Result<ReadOutcome> {
    let mut pending = PendingStatement::new();

    loop {
        let (line, origin) = if let Some(line) = session.read_redirected_line() {
            (line, Origin::Redirected)
        } else {
            let prompt = if pending.is_empty() {
                &prompts.primary
            } else {
                &prompts.continuation
            };
            match editor.read_line(prompt)? {
                ReadResult::Line(line) => (chomp(&line).to_string(), Origin::Interactive),
                ReadResult::Interrupted => return Ok(ReadOutcome::Cancelled),
                ReadResult::Eof if pending.is_empty() => return Ok(ReadOutcome::Eof),
                ReadResult::Eof => return Ok(ReadOutcome::Statement(pending.finish())),
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        if origin == Origin::Redirected {
            let name = session.input_name().unwrap_or_default();
            writeln!(out, "{name} >> {line}").map_err(output_error)?;
        }
        session.echo_line(&line);
        pending.push_line(&line, origin);

        if is_complete(&pending.text) {
            return Ok(ReadOutcome::Statement(pending.finish()));
        }
    }
}
