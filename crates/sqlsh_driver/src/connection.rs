//! The connection abstraction and the values it returns.

use std::time::Duration;

use sqlsh_foundation::{Result, Value, bind};

/// One result row.
pub type Row = Vec<Value>;

/// The outcome of executing a statement.
///
/// An empty column list means the statement was not a query; only
/// `affected` is meaningful then.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Fetched rows, if the driver produced any.
    pub rows: Option<Vec<Row>>,
    /// Affected row count for non-query statements.
    pub affected: Option<u64>,
    /// Wall-clock time spent executing and fetching.
    pub elapsed: Duration,
}

impl ResultSet {
    /// Creates a result for a non-query statement.
    #[must_use]
    pub fn affected(count: u64) -> Self {
        Self {
            affected: Some(count),
            ..Self::default()
        }
    }

    /// Creates a query result.
    #[must_use]
    pub fn query(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Sets the elapsed time.
    #[must_use]
    pub const fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Returns true if the statement returned columns.
    #[must_use]
    pub fn is_query(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Number of fetched rows (0 when absent).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.as_ref().map_or(0, Vec::len)
    }
}

/// Column metadata as reported by describe-columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Precision or length.
    pub precision: Option<u32>,
    /// Scale for exact numerics.
    pub scale: Option<u32>,
    /// Default value expression.
    pub default: Option<String>,
    /// Whether NULL is allowed.
    pub nullable: Option<bool>,
    /// Whether the column is indexed.
    pub indexed: Option<bool>,
    /// Whether the column is part of the primary key.
    pub primary: Option<bool>,
    /// Whether the column is unique.
    pub unique: Option<bool>,
}

impl ColumnInfo {
    /// Header names for a describe-table listing, matching [`ColumnInfo::to_row`].
    pub const HEADERS: [&'static str; 9] = [
        "name",
        "type_name",
        "precision",
        "scale",
        "default",
        "nullable",
        "indexed",
        "primary",
        "unique",
    ];

    /// Creates column metadata with only a name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Marks the column as the primary key (implies indexed, unique, not null).
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary = Some(true);
        self.indexed = Some(true);
        self.unique = Some(true);
        self.nullable = Some(false);
        self
    }

    /// Sets nullability.
    #[must_use]
    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Returns the metadata as one row of values.
    #[must_use]
    pub fn to_row(&self) -> Row {
        vec![
            Value::from(self.name.as_str()),
            Value::from(self.type_name.as_str()),
            Value::from(self.precision.map(i64::from)),
            Value::from(self.scale.map(i64::from)),
            Value::from(self.default.clone()),
            Value::from(self.nullable),
            Value::from(self.indexed),
            Value::from(self.primary),
            Value::from(self.unique),
        ]
    }
}

/// An open database session.
///
/// All operations are synchronous; the shell owns exactly one connection.
pub trait Connection {
    /// Executes a statement and fetches all of its rows.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the statement fails.
    fn execute(&mut self, sql: &str) -> Result<ResultSet>;

    /// Binds literal parameters into `?` placeholders, then executes.
    ///
    /// # Errors
    ///
    /// Returns a bind error on a placeholder count mismatch, or a driver error.
    fn execute_with(&mut self, sql: &str, params: &[Value]) -> Result<ResultSet> {
        let bound = bind(sql, params)?;
        self.execute(&bound)
    }

    /// Commits the current transaction.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the commit fails.
    fn commit(&mut self) -> Result<()>;

    /// Rolls back the current transaction.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the rollback fails.
    fn rollback(&mut self) -> Result<()>;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the close fails.
    fn disconnect(&mut self) -> Result<()>;

    /// Lists all table names.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the catalog cannot be read.
    fn tables(&mut self) -> Result<Vec<String>>;

    /// Describes the columns of a table.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the table does not exist.
    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Current autocommit mode, if the driver knows it.
    fn autocommit(&self) -> Option<bool>;

    /// Switches autocommit mode.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the mode cannot be changed.
    fn set_autocommit(&mut self, on: bool) -> Result<()>;
}
