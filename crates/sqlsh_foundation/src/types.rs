//! Declared column types, as far as coercion cares about them.

use std::fmt;

/// Coercion target derived from a declared SQL type name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// Integral types.
    Integer,
    /// Approximate and exact non-integral numerics.
    Float,
    /// Character and anything unrecognized.
    Text,
    /// Boolean.
    Boolean,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Calendar date.
    Date,
}

impl SqlType {
    /// Maps a declared type name (e.g. `VARCHAR(20)`, `int`) to a coercion target.
    ///
    /// Any length/precision suffix is ignored.
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        let base = name
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or("")
            .to_ascii_uppercase();

        match base.as_str() {
            "INT" | "INTEGER" | "SMALLINT" | "BIGINT" | "TINYINT" | "LONG" => Self::Integer,
            "FLOAT" | "REAL" | "DOUBLE" | "DECIMAL" | "NUMERIC" | "NUMBER" => Self::Float,
            "BOOL" | "BOOLEAN" => Self::Boolean,
            "TIME" => Self::Time,
            "TIMESTAMP" | "DATETIME" => Self::Timestamp,
            "DATE" => Self::Date,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Text => "VARCHAR",
            Self::Boolean => "BOOLEAN",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
        };
        write!(f, "{name}")
    }
}
