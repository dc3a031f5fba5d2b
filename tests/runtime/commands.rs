//! Integration tests for meta-command handlers

use std::fs;

use sqlsh_driver::MemoryConnection;
use sqlsh_runtime::{Autocommit, DEFAULT_PAGE_LENGTH, Flow, Repl, Session};

use crate::support::{BrokenPipe, Captured, Harness, ScriptedEditor};

#[test]
fn autocommit_reports_and_switches() {
    let mut h = Harness::new(&["\\a", "\\a off", "\\a", "\\autocommit ON", "\\q"]);
    let out = h.run();
    let expected = [
        "\nAUTOCOMMIT is currently switched ON\n\n",
        "\nAUTOCOMMIT IS NOW OFF\n\n",
        "\nAUTOCOMMIT is currently switched OFF\n\n",
        "\nAUTOCOMMIT IS NOW ON\n\n",
    ];
    let mut rest = out.as_str();
    for message in expected {
        let at = rest.find(message).unwrap_or_else(|| panic!("missing {message:?}"));
        rest = &rest[at + message.len()..];
    }
    assert_eq!(h.repl.session().autocommit(), Autocommit::On);
    assert_eq!(h.db.autocommit(), Some(true));
}

#[test]
fn unrecognized_autocommit_argument_changes_nothing() {
    let mut h = Harness::new(&[]);
    h.repl.dispatch("\\a off").unwrap();
    h.repl.dispatch("\\a maybe").unwrap();
    assert_eq!(h.repl.session().autocommit(), Autocommit::Off);
    assert_eq!(h.db.autocommit(), Some(false));
    assert!(h.out.text().ends_with("\nAUTOCOMMIT is currently switched OFF\n\n"));
}

#[test]
fn failed_autocommit_switch_keeps_previous_mode() {
    let mut h = Harness::new(&[]);
    h.db.close();
    let err = h.repl.dispatch("\\a off").unwrap_err();
    assert!(err.is_driver());
    assert!(err.to_string().contains("connection is closed"));
    assert_eq!(h.repl.session().autocommit(), Autocommit::On);
    assert_eq!(h.db.autocommit(), Some(true));
    assert!(!h.out.text().contains("AUTOCOMMIT IS NOW OFF"));
}

#[test]
fn unknown_autocommit_state_is_reported() {
    let conn = MemoryConnection::new();
    conn.handle().forget_autocommit();
    let out = Captured::default();
    let mut repl = Repl::with_editor(ScriptedEditor::new(&[]), Session::new(Box::new(conn)))
        .with_output(Box::new(out.clone()))
        .without_banner();

    repl.dispatch("\\autocommit").unwrap();
    assert_eq!(repl.session().autocommit(), Autocommit::Unknown);
    assert_eq!(out.text(), "\nAUTOCOMMIT is in unknown state\n\n");
}

#[test]
fn page_length_parses_leading_integer() {
    let mut h = Harness::new(&[]);
    let cases = [
        ("\\pl 12", 12),
        ("\\pl 0", DEFAULT_PAGE_LENGTH),
        ("\\pl -3", DEFAULT_PAGE_LENGTH),
        ("\\pl abc", DEFAULT_PAGE_LENGTH),
        ("\\pl 20rows", 20),
        ("\\pl", DEFAULT_PAGE_LENGTH),
    ];
    for (command, expected) in cases {
        h.repl.dispatch(command).unwrap();
        assert_eq!(h.repl.session().page_length(), expected, "{command}");
        assert!(
            h.out
                .text()
                .ends_with(&format!("\nNew page length is {expected}.\n\n"))
        );
    }
}

#[test]
fn unknown_command_changes_nothing() {
    let mut h = Harness::new(&[]);
    h.repl.dispatch("\\zzz").unwrap();
    assert_eq!(h.out.text(), "\nUnknown command!\n\n");
    assert_eq!(h.repl.session().page_length(), DEFAULT_PAGE_LENGTH);
    assert_eq!(h.repl.session().autocommit(), Autocommit::On);
    assert!(!h.repl.session().is_echoing());
    assert!(h.db.executed().is_empty());
}

#[test]
fn output_redirect_records_consumed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let name = path.display().to_string();
    let open = format!("\\o {name}");

    let mut h = Harness::new(&[open.as_str(), "select *", "  from people;", "\\o", "\\c", "\\q"]);
    let out = h.run();

    assert!(out.contains(&format!("\nSet OUTPUT to file {name}\n")));
    assert!(out.contains("\nDisabled OUTPUT\n"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "select *\n  from people;\n\\o\n"
    );
}

#[test]
fn failed_output_redirect_keeps_previous_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.txt");
    let good = format!("\\o {}", path.display());

    let mut h = Harness::new(&[
        good.as_str(),
        "\\o /nonexistent/dir/log.txt",
        "\\c",
        "\\q",
    ]);
    let out = h.run();

    assert!(out.contains("\nCouldn't set OUTPUT to file /nonexistent/dir/log.txt\n"));
    let recorded = fs::read_to_string(&path).unwrap();
    assert_eq!(recorded, "\\o /nonexistent/dir/log.txt\n\\c\n\\q\n");
    assert_eq!(h.db.commits(), 1);
}

#[test]
fn commit_and_rollback_reach_the_driver() {
    let mut h = Harness::new(&["\\commit", "\\r", "\\rollback", "\\q"]);
    let out = h.run();
    assert_eq!(h.db.commits(), 1);
    assert_eq!(h.db.rollbacks(), 2);
    assert_eq!(out.matches("\nROLLBACK\n").count(), 2);
}

#[test]
fn tables_lists_catalog() {
    let mut h = Harness::new(&[]);
    h.db.create_table("orders", &[("id", "INT")], &[]);
    h.repl.dispatch("\\tables").unwrap();
    let out = h.out.text();
    assert!(out.starts_with("\nTables:\n+------------+\n| Table name |\n"));
    assert!(out.contains("| people     |"));
    assert!(out.contains("| orders     |"));
    assert!(h.repl.session().tables().contains("orders"));
}

#[test]
fn describe_lists_column_metadata() {
    let mut h = Harness::new(&[]);
    h.repl.dispatch("\\dt people").unwrap();
    let out = h.out.text();
    assert!(out.starts_with("\nTable 'people':\n"));
    for header in [
        "name",
        "type_name",
        "precision",
        "scale",
        "default",
        "nullable",
        "indexed",
        "primary",
        "unique",
    ] {
        assert!(out.contains(header), "{header}");
    }
    assert!(out.contains("VARCHAR(40)"));
}

#[test]
fn describe_missing_table_is_an_error() {
    let mut h = Harness::new(&[]);
    let err = h.repl.dispatch("\\dt nowhere").unwrap_err();
    assert!(err.is_driver());
    assert_eq!(
        err.context.and_then(|c| c.source).as_deref(),
        Some("\\dt nowhere")
    );
}

#[test]
fn help_shows_reference_table() {
    let mut h = Harness::new(&[]);
    h.repl.dispatch("\\h").unwrap();
    let out = h.out.text();
    assert!(out.starts_with("\nHelp:\n"));
    assert!(out.contains("| Function "));
    assert!(out.contains("Quit this program"));
    assert!(!out.contains("\\rb"));
}

#[test]
fn quit_closes_the_connection() {
    let mut h = Harness::new(&[]);
    assert_eq!(h.repl.dispatch("\\q").unwrap(), Flow::Quit);
    assert_eq!(h.out.text(), "\nBYE\n\n");
    assert!(!h.db.is_open());
}

fn broken_output_repl(lines: &[&str]) -> (Repl<ScriptedEditor>, sqlsh_driver::MemoryHandle, usize) {
    let conn = MemoryConnection::demo();
    let db = conn.handle();
    let editor = ScriptedEditor::new(lines);
    let prompts = std::rc::Rc::clone(&editor.prompts);
    let mut repl = Repl::with_editor(editor, Session::new(Box::new(conn)))
        .with_output(Box::new(BrokenPipe))
        .without_banner();
    repl.run().unwrap();
    let reads = prompts.borrow().len();
    (repl, db, reads)
}

#[test]
fn quit_closes_even_when_output_is_broken() {
    let (repl, db, reads) = broken_output_repl(&["\\q", "\\q"]);
    assert_eq!(reads, 1);
    assert!(!db.is_open());
    assert_eq!(repl.session().autocommit(), Autocommit::On);
}

#[test]
fn end_of_input_ends_loop_when_output_is_broken() {
    let (_, db, reads) = broken_output_repl(&[]);
    assert_eq!(reads, 1);
    assert!(!db.is_open());
}
