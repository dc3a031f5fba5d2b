//! Integration tests for the Memory driver

use sqlsh_driver::{ColumnInfo, Connection, MemoryConnection, ResultSet};
use sqlsh_foundation::Value;

#[test]
fn tables_are_built_from_typed_text() {
    let conn = MemoryConnection::new();
    let handle = conn.handle();
    handle.create_table(
        "scores",
        &[("id", "INT"), ("score", "FLOAT"), ("passed", "BOOLEAN")],
        &[
            &[Some("1"), Some(" 9.5 "), Some("t")],
            &[Some("2"), None, Some("x")],
        ],
    );

    let mut conn = conn;
    let rs = conn.execute("SELECT * FROM scores;").unwrap();
    assert_eq!(rs.columns, vec!["id", "score", "passed"]);
    let rows = rs.rows.unwrap();
    assert_eq!(
        rows[0],
        vec![Value::Integer(1), Value::Float(9.5), Value::Boolean(true)]
    );
    assert_eq!(rows[1], vec![Value::Integer(2), Value::Null, Value::Null]);
}

#[test]
fn columns_describe_the_catalog() {
    let mut conn = MemoryConnection::demo();
    let columns = conn.columns("people").unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "born", "active"]);
    assert_eq!(columns[0].primary, Some(true));
    assert_eq!(columns[1].type_name, "VARCHAR(40)");
    assert!(conn.columns("missing").is_err());
}

#[test]
fn canned_responses_match_ignoring_layout() {
    let mut conn = MemoryConnection::new();
    let handle = conn.handle();
    handle.respond("insert into t values (1)", ResultSet::affected(1));
    let rs = conn.execute("insert  into t\n values (1);").unwrap();
    assert_eq!(rs.affected, Some(1));

    handle.fail("drop table t", "permission denied");
    let err = conn.execute("drop table t;").unwrap_err();
    assert!(err.is_driver());
}

#[test]
fn unknown_statements_affect_nothing() {
    let mut conn = MemoryConnection::new();
    let rs = conn.execute("create table t (id int)").unwrap();
    assert!(!rs.is_query());
    assert_eq!(rs.affected, Some(0));
    assert_eq!(conn.handle().executed(), vec!["create table t (id int)"]);
}

#[test]
fn transactions_and_autocommit_are_tracked() {
    let mut conn = MemoryConnection::new();
    let handle = conn.handle();
    conn.commit().unwrap();
    conn.commit().unwrap();
    conn.rollback().unwrap();
    conn.set_autocommit(false).unwrap();
    assert_eq!(handle.commits(), 2);
    assert_eq!(handle.rollbacks(), 1);
    assert_eq!(conn.autocommit(), Some(false));
}

#[test]
fn closed_connection_refuses_work() {
    let mut conn = MemoryConnection::demo();
    let handle = conn.handle();
    conn.disconnect().unwrap();
    assert!(!handle.is_open());
    assert!(conn.execute("SELECT * FROM people").is_err());
    assert!(conn.tables().is_err());
}

#[test]
fn failed_disconnect_leaves_connection_open() {
    let mut conn = MemoryConnection::new();
    let handle = conn.handle();
    handle.fail_disconnect("busy");
    assert_eq!(conn.disconnect().unwrap_err().to_string(), "busy");
    assert!(handle.is_open());
    conn.disconnect().unwrap();
}

#[test]
fn execute_with_binds_parameters() {
    let mut conn = MemoryConnection::new();
    conn.execute_with(
        "DELETE FROM people WHERE name = ? AND id > ?",
        &[Value::from("Ada"), Value::Integer(2)],
    )
    .unwrap();
    assert_eq!(
        conn.handle().executed(),
        vec!["DELETE FROM people WHERE name = 'Ada' AND id > 2"]
    );
    assert!(conn.execute_with("SELECT ?", &[]).is_err());
}

#[test]
fn column_info_rows_line_up_with_headers() {
    let info = ColumnInfo::new("born", "DATE").with_nullable(true);
    let row = info.to_row();
    assert_eq!(row.len(), ColumnInfo::HEADERS.len());
    assert_eq!(row[1], Value::from("DATE"));
    assert_eq!(row[5], Value::Boolean(true));
}
