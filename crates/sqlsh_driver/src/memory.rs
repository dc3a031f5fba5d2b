//! Loopback driver backed by an in-process catalog.
//!
//! The `Memory` driver does not interpret SQL. It serves
//! `SELECT * FROM <table>` from tables registered through a
//! [`MemoryHandle`], answers other statements from canned responses, and
//! reports zero affected rows for anything else. It exists so the shell can
//! run without an external database and so tests can observe exactly what the
//! shell sent to its connection.
//!
//! Data sources:
//! - `dbi:Memory:` - empty catalog
//! - `dbi:Memory:demo` - catalog with a sample `people` table

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use sqlsh_foundation::coerce::coerce_as;
use sqlsh_foundation::{Error, ErrorContext, Result, SqlType};
use tracing::debug;

use crate::connection::{ColumnInfo, Connection, ResultSet, Row};
use crate::registry::Driver;

/// The `Memory` driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryDriver;

impl Driver for MemoryDriver {
    fn name(&self) -> &str {
        "Memory"
    }

    fn data_sources(&self) -> Result<Vec<String>> {
        Ok(vec!["dbi:Memory:".to_string(), "dbi:Memory:demo".to_string()])
    }

    fn connect(
        &self,
        data_source: &str,
        _user: Option<&str>,
        _password: Option<&str>,
    ) -> Result<Box<dyn Connection>> {
        match data_source {
            "" => Ok(Box::new(MemoryConnection::new())),
            "demo" => Ok(Box::new(MemoryConnection::demo())),
            other => Err(Error::driver(format!(
                "unknown Memory data source '{other}'"
            ))),
        }
    }
}

struct MemoryTable {
    name: String,
    columns: Vec<ColumnInfo>,
    rows: Vec<Row>,
}

struct MemoryState {
    tables: Vec<MemoryTable>,
    responses: HashMap<String, std::result::Result<ResultSet, String>>,
    executed: Vec<String>,
    autocommit: Option<bool>,
    commits: usize,
    rollbacks: usize,
    open: bool,
    disconnect_failure: Option<String>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            responses: HashMap::new(),
            executed: Vec::new(),
            autocommit: Some(true),
            commits: 0,
            rollbacks: 0,
            open: true,
            disconnect_failure: None,
        }
    }
}

impl MemoryState {
    fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn ensure_open(&self, op: &str) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::driver(format!("{op}: connection is closed")))
        }
    }
}

/// Collapses whitespace and drops a trailing semicolon, so canned responses
/// match regardless of layout.
fn normalize(sql: &str) -> String {
    let joined = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    joined.trim_end_matches(';').trim_end().to_string()
}

/// Returns the table name of a `SELECT * FROM <table>` statement.
fn select_all_target(sql: &str) -> Option<&str> {
    let words: Vec<&str> = sql.split_whitespace().collect();
    match words.as_slice() {
        [select, "*", from, table]
            if select.eq_ignore_ascii_case("select") && from.eq_ignore_ascii_case("from") =>
        {
            Some(table.trim_end_matches(';'))
        }
        _ => None,
    }
}

/// A connection to the in-process catalog.
pub struct MemoryConnection {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryConnection {
    /// Creates a connection with an empty catalog and autocommit on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState::default())),
        }
    }

    /// Creates a connection whose catalog holds the sample `people` table.
    #[must_use]
    pub fn demo() -> Self {
        let conn = Self::new();
        conn.handle().create_table(
            "people",
            &[
                ("id", "INTEGER"),
                ("name", "VARCHAR(40)"),
                ("born", "DATE"),
                ("active", "BOOLEAN"),
            ],
            &[
                &[Some("1"), Some("Ada Lovelace"), Some("1815-12-10"), Some("t")],
                &[Some("2"), Some("Alan Turing"), Some("1912-06-23"), Some("t")],
                &[Some("3"), Some("Grace Hopper"), Some("1906-12-09"), None],
            ],
        );
        conn
    }

    /// Returns a handle for configuring and inspecting this connection after
    /// it has been handed to the shell.
    #[must_use]
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            state: Rc::clone(&self.state),
        }
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MemoryConnection {
    fn execute(&mut self, sql: &str) -> Result<ResultSet> {
        let mut state = self.state.borrow_mut();
        state.ensure_open("execute")?;
        state.executed.push(sql.to_string());
        debug!(sql, "memory execute");

        let key = normalize(sql);
        if let Some(response) = state.responses.get(&key) {
            return response.clone().map_err(|message| {
                Error::driver(message).with_context(
                    ErrorContext::new()
                        .with_source(sql)
                        .with_frame("memory::execute"),
                )
            });
        }

        if let Some(name) = select_all_target(&key) {
            let table = state.table(name).ok_or_else(|| {
                Error::driver(format!("no such table: {name}"))
                    .with_context(ErrorContext::new().with_source(sql))
            })?;
            let columns = table.columns.iter().map(|c| c.name.clone()).collect();
            return Ok(ResultSet::query(columns, table.rows.clone()));
        }

        Ok(ResultSet::affected(0))
    }

    fn commit(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ensure_open("commit")?;
        state.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ensure_open("rollback")?;
        state.rollbacks += 1;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ensure_open("disconnect")?;
        if let Some(message) = state.disconnect_failure.take() {
            return Err(Error::driver(message));
        }
        state.open = false;
        Ok(())
    }

    fn tables(&mut self) -> Result<Vec<String>> {
        let state = self.state.borrow();
        state.ensure_open("tables")?;
        Ok(state.tables.iter().map(|t| t.name.clone()).collect())
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>> {
        let state = self.state.borrow();
        state.ensure_open("columns")?;
        state
            .table(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| Error::driver(format!("no such table: {table}")))
    }

    fn autocommit(&self) -> Option<bool> {
        self.state.borrow().autocommit
    }

    fn set_autocommit(&mut self, on: bool) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ensure_open("set autocommit")?;
        state.autocommit = Some(on);
        Ok(())
    }
}

/// Shared view of a [`MemoryConnection`]'s state.
#[derive(Clone)]
pub struct MemoryHandle {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryHandle {
    /// Registers a table. Cells are coerced from text according to each
    /// column's declared type; the first column is the primary key.
    pub fn create_table(&self, name: &str, columns: &[(&str, &str)], rows: &[&[Option<&str>]]) {
        let infos: Vec<ColumnInfo> = columns
            .iter()
            .enumerate()
            .map(|(i, (col, ty))| {
                let info = ColumnInfo::new(*col, *ty);
                if i == 0 {
                    info.primary_key()
                } else {
                    info.with_nullable(true)
                }
            })
            .collect();

        let types: Vec<SqlType> = columns
            .iter()
            .map(|(_, ty)| SqlType::from_type_name(ty))
            .collect();

        let rows = rows
            .iter()
            .map(|cells| {
                types
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| coerce_as(*ty, cells.get(i).copied().flatten()))
                    .collect()
            })
            .collect();

        let mut state = self.state.borrow_mut();
        state.tables.retain(|t| !t.name.eq_ignore_ascii_case(name));
        state.tables.push(MemoryTable {
            name: name.to_string(),
            columns: infos,
            rows,
        });
    }

    /// Answers `sql` with a fixed result.
    pub fn respond(&self, sql: &str, result: ResultSet) {
        self.state
            .borrow_mut()
            .responses
            .insert(normalize(sql), Ok(result));
    }

    /// Makes `sql` fail with a driver error.
    pub fn fail(&self, sql: &str, message: &str) {
        self.state
            .borrow_mut()
            .responses
            .insert(normalize(sql), Err(message.to_string()));
    }

    /// Makes the next disconnect fail with a driver error.
    pub fn fail_disconnect(&self, message: &str) {
        self.state.borrow_mut().disconnect_failure = Some(message.to_string());
    }

    /// Closes the connection from the outside, as a dropped server link would.
    /// Every later operation fails with a driver error.
    pub fn close(&self) {
        self.state.borrow_mut().open = false;
    }

    /// Forgets the autocommit mode, as a driver that cannot report it would.
    pub fn forget_autocommit(&self) {
        self.state.borrow_mut().autocommit = None;
    }

    /// Statements executed so far, verbatim.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    /// Number of commits.
    #[must_use]
    pub fn commits(&self) -> usize {
        self.state.borrow().commits
    }

    /// Number of rollbacks.
    #[must_use]
    pub fn rollbacks(&self) -> usize {
        self.state.borrow().rollbacks
    }

    /// Autocommit mode as the driver sees it.
    #[must_use]
    pub fn autocommit(&self) -> Option<bool> {
        self.state.borrow().autocommit
    }

    /// Whether the connection is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }
}
