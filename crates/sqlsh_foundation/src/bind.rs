//! Literal parameter binding.
//!
//! Drivers without native parameter support can call [`bind`] to substitute
//! `?` placeholders with quoted literals before sending the statement.
//! Placeholders inside strings, quoted identifiers, and comments are left
//! alone.

use crate::error::{Error, Result};
use crate::lexer::{Lexer, TokenKind};
use crate::value::Value;

/// Renders a value as a SQL literal. Non-finite floats have no literal form
/// and become `NULL`.
#[must_use]
pub fn quote(value: &Value) -> String {
    match value {
        Value::Float(n) if n.is_finite() => n.to_string(),
        Value::Null | Value::Float(_) => "NULL".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Boolean(true) => "TRUE".to_string(),
        Value::Boolean(false) => "FALSE".to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Time(_) | Value::Timestamp(_) | Value::Date(_) => format!("'{value}'"),
    }
}

/// Substitutes each `?` placeholder in `sql` with the next parameter.
///
/// # Errors
///
/// Returns a bind mismatch error if the number of placeholders differs from
/// the number of parameters.
pub fn bind(sql: &str, params: &[Value]) -> Result<String> {
    let placeholders = Lexer::new(sql)
        .filter(|t| t.kind == TokenKind::Placeholder)
        .count();
    if placeholders != params.len() {
        return Err(Error::bind_mismatch(placeholders, params.len()));
    }

    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut params = params.iter();
    for token in Lexer::new(sql) {
        match (token.kind == TokenKind::Placeholder)
            .then(|| params.next())
            .flatten()
        {
            Some(value) => out.push_str(&quote(value)),
            None => out.push_str(token.text),
        }
    }
    Ok(out)
}
