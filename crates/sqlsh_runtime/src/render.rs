//! Result rendering.

use std::io::{self, Write};
use std::time::Duration;

use sqlsh_driver::ResultSet;

use crate::table::{PageAction, TableFormatter};

/// SQL words offered for completion and highlighted in input.
pub const SQL_KEYWORDS: &[&str] = &[
    "INSERT", "DELETE", "UPDATE", "SELECT", "FROM", "WHERE", "IN", "LIKE", "SET", "VALUES", "INTO",
    "CREATE", "TABLE", "DROP", "COMMIT", "ROLLBACK", "CHAR", "VARCHAR", "VARCHAR2", "INT",
    "INTEGER", "NUMBER", "FLOAT", "REAL", "LONG", "CLOB", "BLOB", "DECIMAL", "DBCLOB", "DBBLOB",
];

/// The SQL keywords followed by the given table names.
pub fn completion_keywords<I, S>(tables: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SQL_KEYWORDS
        .iter()
        .map(ToString::to_string)
        .chain(tables.into_iter().map(|t| t.as_ref().to_string()))
        .collect()
}

/// `No rows affected`, `1 row affected`, or `N rows affected`.
#[must_use]
pub fn affected_summary(count: u64) -> String {
    match count {
        0 => "No rows affected".to_string(),
        1 => "1 row affected".to_string(),
        n => format!("{n} rows affected"),
    }
}

/// `No rows in set` when nothing was fetched, else `1 row in set` or
/// `N rows in set`.
#[must_use]
pub fn rows_summary(count: Option<usize>) -> String {
    match count {
        None => "No rows in set".to_string(),
        Some(1) => "1 row in set".to_string(),
        Some(n) => format!("{n} rows in set"),
    }
}

/// Elapsed time in seconds, truncated to whole milliseconds: `(1.234 sec)`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    format!("({}.{:03} sec)", millis / 1000, millis % 1000)
}

/// Writes a statement result: a row count for non-queries, otherwise the
/// paged table and a summary with the elapsed time.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render(
    out: &mut dyn Write,
    result: &ResultSet,
    page_length: usize,
    pager: &mut dyn FnMut() -> PageAction,
) -> io::Result<()> {
    if !result.is_query() {
        writeln!(out)?;
        writeln!(out, "  {}", affected_summary(result.affected.unwrap_or(0)))?;
        return writeln!(out);
    }

    writeln!(out)?;
    let rows = result.rows.as_deref().unwrap_or_default();
    TableFormatter::new(result.columns.clone(), rows).write_paged(out, page_length, pager)?;
    writeln!(
        out,
        "  {} {}",
        rows_summary(result.rows.as_ref().map(Vec::len)),
        format_elapsed(result.elapsed)
    )?;
    writeln!(out)
}
