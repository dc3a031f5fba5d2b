//! Integration tests for parameter binding

use sqlsh_foundation::{ErrorKind, Value, bind, quote};

#[test]
fn binds_mixed_values() {
    let sql = bind(
        "UPDATE people SET name = ?, active = ?, score = ? WHERE id = ?",
        &[
            Value::from("O'Hara"),
            Value::Boolean(false),
            Value::Float(1.5),
            Value::Integer(3),
        ],
    )
    .unwrap();
    assert_eq!(
        sql,
        "UPDATE people SET name = 'O''Hara', active = FALSE, score = 1.5 WHERE id = 3"
    );
}

#[test]
fn quoted_placeholders_are_not_counted() {
    let sql = bind("SELECT '?', \"?\" FROM t WHERE a = ? -- ?", &[Value::Null]).unwrap();
    assert_eq!(sql, "SELECT '?', \"?\" FROM t WHERE a = NULL -- ?");
}

#[test]
fn count_mismatch_is_an_error() {
    let err = bind("SELECT ?", &[]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::BindMismatch {
            placeholders: 1,
            params: 0
        }
    ));
    assert_eq!(err.to_string(), "bind mismatch: 1 placeholders, 0 parameters");
}

#[test]
fn no_placeholders_no_params() {
    assert_eq!(bind("SELECT 1", &[]).unwrap(), "SELECT 1");
}

#[test]
fn quote_escapes_text() {
    assert_eq!(quote(&Value::from("a'b'c")), "'a''b''c'");
    assert_eq!(quote(&Value::Null), "NULL");
}
