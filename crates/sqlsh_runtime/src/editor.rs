//! Line editor abstraction for the REPL.
//!
//! The REPL only talks to [`LineEditor`], so tests can drive it with scripted
//! input while the binary uses rustyline.

use std::borrow::Cow;
use std::path::Path;

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};
use sqlsh_foundation::{Error, ErrorKind, Result};
use tracing::debug;

use crate::highlight::SqlHighlighter;
use crate::render::completion_keywords;

/// Result of reading a line from the editor.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);

    /// Replace the words offered for completion.
    fn set_keywords(&mut self, keywords: Vec<String>);

    /// Load history from a file. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn load_history(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Save history to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save_history(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[derive(Helper, Completer, Hinter, Validator)]
struct SqlHelper {
    #[rustyline(Completer)]
    completer: SqlCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    highlighter: SqlHighlighter,
}

impl Highlighter for SqlHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completes SQL keywords and table names, or file paths after `\i` and `\o`.
struct SqlCompleter {
    file_completer: FilenameCompleter,
    keywords: Vec<String>,
}

impl SqlCompleter {
    fn new() -> Self {
        Self {
            file_completer: FilenameCompleter::new(),
            keywords: completion_keywords(std::iter::empty::<&str>()),
        }
    }

    fn candidates(&self, word: &str) -> Vec<Pair> {
        self.keywords
            .iter()
            .filter(|kw| {
                kw.get(..word.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(word))
            })
            .map(|kw| Pair {
                display: kw.clone(),
                replacement: kw.clone(),
            })
            .collect()
    }
}

/// Returns true if the line is a file-taking meta-command.
fn wants_filename(line: &str) -> bool {
    let head = line
        .trim_start()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(head.as_str(), "\\i" | "\\input" | "\\o" | "\\output")
}

impl Completer for SqlCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        if before.contains(char::is_whitespace) && wants_filename(before) {
            return self.file_completer.complete(line, pos, ctx);
        }

        let start = before
            .rfind(|c: char| c.is_whitespace() || "(),;".contains(c))
            .map_or(0, |i| i + 1);
        Ok((start, self.candidates(&before[start..])))
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<SqlHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor keeping up to `history_size` entries.
    ///
    /// # Errors
    ///
    /// Returns an editor error if the history size is rejected or the
    /// terminal cannot be initialized.
    pub fn new(history_size: usize) -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(history_size)
            .map_err(editor_error)?
            .build();

        let helper = SqlHelper {
            completer: SqlCompleter::new(),
            hinter: HistoryHinter::new(),
            highlighter: SqlHighlighter::new(),
        };

        let mut editor = Editor::with_config(config).map_err(editor_error)?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

fn editor_error(e: ReadlineError) -> Error {
    Error::new(ErrorKind::Editor(e.to_string()))
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(editor_error(e)),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.keywords = keywords;
        }
    }

    fn load_history(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        debug!(path = %path.display(), "loading history");
        self.editor.load_history(path).map_err(editor_error)
    }

    fn save_history(&mut self, path: &Path) -> Result<()> {
        self.editor.save_history(path).map_err(editor_error)
    }
}
