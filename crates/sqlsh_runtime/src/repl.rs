//! The main REPL implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use sqlsh_driver::{ColumnInfo, Row};
use sqlsh_foundation::coerce::leading_integer;
use sqlsh_foundation::{Error, ErrorKind, Result, Value};
use tracing::{debug, warn};

use crate::command::{HELP, MetaCommand};
use crate::config::ShellConfig;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::input::{Origin, Prompts, ReadOutcome, Redirect, read_statement};
use crate::render::{completion_keywords, render};
use crate::session::{Autocommit, Session};
use crate::table::{PageAction, TableFormatter};

const PAGER_PROMPT: &str = "-- more (a to abort) -- ";

/// What the loop does after a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next statement.
    Continue,
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Connection and meta-command state.
    session: Session,

    /// Where results and messages go.
    out: Box<dyn Write>,

    /// Primary and continuation prompts.
    prompts: Prompts,

    /// Print error context along with messages.
    debug: bool,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// History file loaded at start and saved at exit.
    history_file: Option<PathBuf>,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL with the rustyline editor, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an editor error if the terminal cannot be initialized.
    pub fn new(session: Session, config: &ShellConfig) -> Result<Self> {
        let editor = RustylineEditor::new(config.history_size)?;
        Ok(Self::with_editor(editor, session).with_config(config))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor, writing to standard output.
    pub fn with_editor(editor: E, session: Session) -> Self {
        Self {
            editor,
            session,
            out: Box::new(io::stdout()),
            prompts: Prompts::default(),
            debug: false,
            show_banner: true,
            history_file: None,
        }
    }

    /// Applies prompts, page length, debug output, and the history file.
    #[must_use]
    pub fn with_config(mut self, config: &ShellConfig) -> Self {
        self.prompts = Prompts {
            primary: config.prompt.clone(),
            continuation: config.continuation_prompt.clone(),
        };
        self.session
            .set_page_length(i64::try_from(config.page_length).unwrap_or(0));
        self.debug = config.debug;
        self.history_file = config.history_path();
        self
    }

    /// Sends results and messages to `out` instead of standard output.
    #[must_use]
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the REPL loop until quit or end of input.
    ///
    /// Statement errors are printed and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an editor error if the terminal becomes unusable.
    pub fn run(&mut self) -> Result<()> {
        if let Some(path) = &self.history_file {
            if let Err(e) = self.editor.load_history(path) {
                warn!(error = %e, "could not load history");
            }
        }
        self.refresh_keywords();
        if self.show_banner {
            self.print_banner();
        }

        let outcome = loop {
            match self.read_eval_print() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break Ok(()),
                Err(e) if matches!(e.kind, ErrorKind::Editor(_)) => break Err(e),
                Err(e) => self.print_error(&e),
            }
        };

        self.save_history();
        let _ = self.out.flush();
        outcome
    }

    /// Executes one read-dispatch-print iteration.
    fn read_eval_print(&mut self) -> Result<Flow> {
        let outcome = read_statement(
            &mut self.editor,
            &mut self.session,
            &mut *self.out,
            &self.prompts,
        )?;

        match outcome {
            ReadOutcome::Eof => self.quit(),
            ReadOutcome::Cancelled => {
                self.emit("\n")?;
                Ok(Flow::Continue)
            }
            ReadOutcome::Statement(statement) => {
                if statement.origin == Origin::Interactive {
                    self.editor.add_history(&statement.text);
                }
                self.dispatch(&statement.text)
            }
        }
    }

    /// Runs one complete statement: a meta-command or SQL.
    ///
    /// # Errors
    ///
    /// Returns driver errors and output errors. The session stays usable.
    pub fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if !line.starts_with('\\') {
            self.execute_sql(line)?;
            return Ok(Flow::Continue);
        }

        let command = MetaCommand::parse(line);
        debug!(?command, "meta-command");
        let result = match command {
            MetaCommand::Quit => return self.quit(),
            MetaCommand::Help => self.help(),
            MetaCommand::ListTables => self.list_tables(),
            MetaCommand::DescribeTable(table) => self.describe_table(&table),
            MetaCommand::Select(table) => self.execute_sql(&format!("SELECT * FROM {table};")),
            MetaCommand::RubyEval(_) | MetaCommand::Subshell => {
                self.report("Ruby evaluation is not supported by sqlsh")
            }
            MetaCommand::Commit => self.commit(),
            MetaCommand::Rollback => self.rollback(),
            MetaCommand::Autocommit(mode) => self.autocommit(&mode),
            MetaCommand::Input(file) => self.redirect_input(&file),
            MetaCommand::Output(file) => self.redirect_output(&file),
            MetaCommand::PageLength(n) => self.page_length(&n),
            MetaCommand::Unknown(_) => self.report("Unknown command!"),
        };

        result.map_err(|e| with_statement(e, line))?;
        Ok(Flow::Continue)
    }

    /// Executes SQL and renders its result.
    ///
    /// A trailing `;` is removed before the statement reaches the driver.
    ///
    /// # Errors
    ///
    /// Returns the driver error, with the statement attached as context.
    pub fn execute_sql(&mut self, sql: &str) -> Result<()> {
        let sql = strip_terminator(sql);
        debug!(sql, "executing");

        let started = Instant::now();
        let result = self
            .session
            .connection_mut()
            .execute(sql)
            .map_err(|e| with_statement(e, sql))?;
        let result = result.with_elapsed(started.elapsed());

        let page_length = self.session.page_length();
        let editor = &mut self.editor;
        render(&mut *self.out, &result, page_length, &mut || ask_pager(editor))
            .map_err(output_error)?;

        self.refresh_keywords();
        Ok(())
    }

    /// Installs `path` as the input redirection. A file that cannot be opened
    /// is reported and the current input stays.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report cannot be written.
    pub fn redirect_input(&mut self, path: &str) -> Result<()> {
        match Redirect::open(Path::new(path)) {
            Ok(redirect) => {
                self.session.set_input(redirect);
                self.report(&format!("EXECUTE file {path}"))
            }
            Err(e) => {
                warn!(error = %e, "input redirection failed");
                self.report(&format!("Couldn't read from file {path}"))
            }
        }
    }

    fn redirect_output(&mut self, path: &str) -> Result<()> {
        if path.is_empty() {
            self.session.close_echo();
            return self.report("Disabled OUTPUT");
        }
        match self.session.open_echo(Path::new(path)) {
            Ok(()) => self.report(&format!("Set OUTPUT to file {path}")),
            Err(e) => {
                warn!(error = %e, "output redirection failed");
                self.report(&format!("Couldn't set OUTPUT to file {path}"))
            }
        }
    }

    /// Says goodbye and closes the connection. Never fails: an unwritable
    /// output must not keep the loop alive.
    fn quit(&mut self) -> Result<Flow> {
        if let Err(e) = self.report("BYE") {
            warn!(error = %e, "could not write goodbye");
        }
        if let Err(e) = self.session.disconnect() {
            self.print_error(&e);
        }
        Ok(Flow::Quit)
    }

    fn help(&mut self) -> Result<()> {
        self.emit("\nHelp:\n")?;
        self.print_table(&TableFormatter::from_text(&["Function", "Description"], HELP))?;
        self.emit("\n")
    }

    fn list_tables(&mut self) -> Result<()> {
        let rows: Vec<Row> = self
            .session
            .refresh_tables()?
            .iter()
            .map(|name| vec![Value::from(name.as_str())])
            .collect();
        self.refresh_keywords();

        self.emit("\nTables:\n")?;
        self.print_table(&TableFormatter::new(vec!["Table name".to_string()], &rows))?;
        self.emit("\n")
    }

    fn describe_table(&mut self, table: &str) -> Result<()> {
        let rows: Vec<Row> = self
            .session
            .connection_mut()
            .columns(table)?
            .iter()
            .map(ColumnInfo::to_row)
            .collect();
        let headers = ColumnInfo::HEADERS.iter().map(ToString::to_string).collect();

        self.emit(&format!("\nTable '{table}':\n"))?;
        self.print_table(&TableFormatter::new(headers, &rows))?;
        self.emit("\n")
    }

    fn commit(&mut self) -> Result<()> {
        self.session.connection_mut().commit()?;
        self.report("COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        self.session.connection_mut().rollback()?;
        self.report("ROLLBACK")
    }

    fn autocommit(&mut self, mode: &str) -> Result<()> {
        if mode.eq_ignore_ascii_case("on") {
            self.session.set_autocommit(true)?;
            return self.report("AUTOCOMMIT IS NOW ON");
        }
        if mode.eq_ignore_ascii_case("off") {
            self.session.set_autocommit(false)?;
            return self.report("AUTOCOMMIT IS NOW OFF");
        }
        let state = match self.session.autocommit() {
            Autocommit::On => "AUTOCOMMIT is currently switched ON",
            Autocommit::Off => "AUTOCOMMIT is currently switched OFF",
            Autocommit::Unknown => "AUTOCOMMIT is in unknown state",
        };
        self.report(state)
    }

    fn page_length(&mut self, arg: &str) -> Result<()> {
        let requested = leading_integer(arg).unwrap_or(0);
        let page_length = self.session.set_page_length(requested);
        self.report(&format!("New page length is {page_length}."))
    }

    /// Reloads table names and hands them to the completer.
    fn refresh_keywords(&mut self) {
        match self.session.refresh_tables() {
            Ok(tables) => {
                let keywords = completion_keywords(tables);
                self.editor.set_keywords(keywords);
            }
            Err(e) => warn!(error = %e, "could not refresh table names"),
        }
    }

    fn print_table(&mut self, table: &TableFormatter) -> Result<()> {
        let page_length = self.session.page_length();
        let editor = &mut self.editor;
        table
            .write_paged(&mut *self.out, page_length, &mut || ask_pager(editor))
            .map_err(output_error)
    }

    /// Writes a message surrounded by blank lines.
    fn report(&mut self, message: &str) -> Result<()> {
        self.emit(&format!("\n{message}\n\n"))
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).map_err(output_error)
    }

    fn print_error(&mut self, error: &Error) {
        warn!(error = %error, "statement failed");
        let mut message = format!("\n{error}\n");
        if self.debug {
            if let Some(context) = &error.context {
                message.push_str(&context.to_string());
            }
        }
        message.push('\n');
        let _ = self.out.write_all(message.as_bytes());
    }

    fn print_banner(&mut self) {
        let _ = write!(
            self.out,
            "sqlsh {} - type \\h for help, \\q to quit\n\n",
            env!("CARGO_PKG_VERSION")
        );
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(e) = self.editor.save_history(path) {
                warn!(error = %e, "could not save history");
            }
        }
    }
}

/// Records the statement as the error's source unless the driver already did.
fn with_statement(mut error: Error, statement: &str) -> Error {
    let context = error.context.take().unwrap_or_default();
    let context = if context.source.is_some() {
        context
    } else {
        context.with_source(statement)
    };
    error.with_context(context)
}

/// Removes a trailing `;` and any whitespace after it.
fn strip_terminator(sql: &str) -> &str {
    let trimmed = sql.trim_end();
    trimmed.strip_suffix(';').unwrap_or(trimmed)
}

/// Asks whether to show the next page; `a` aborts.
fn ask_pager<E: LineEditor>(editor: &mut E) -> PageAction {
    match editor.read_line(PAGER_PROMPT) {
        Ok(ReadResult::Line(line)) if line.trim_end() == "a" => PageAction::Abort,
        Ok(ReadResult::Line(_)) => PageAction::Continue,
        Ok(ReadResult::Interrupted | ReadResult::Eof) | Err(_) => PageAction::Abort,
    }
}

/// Maps a failed write to the shell output.
pub(crate) fn output_error(e: io::Error) -> Error {
    Error::io(Path::new("<stdout>"), &e)
}
