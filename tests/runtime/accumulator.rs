//! Integration tests for statement accumulation and input redirection

use std::io::Write;

use proptest::prelude::*;
use sqlsh_runtime::input::is_complete;

use crate::support::Harness;

#[test]
fn multi_line_statement_uses_continuation_prompt() {
    let mut h = Harness::new(&["select *", "", "from people", ";", "\\q"]);
    h.run();
    assert_eq!(h.db.executed(), vec!["select *\nfrom people\n"]);
    assert_eq!(
        *h.prompts.borrow(),
        vec!["sqlsh => ", "sqlsh -> ", "sqlsh -> ", "sqlsh -> ", "sqlsh => "]
    );
}

#[test]
fn meta_commands_complete_after_one_line() {
    let mut h = Harness::new(&["\\pl 5", "\\q"]);
    let out = h.run();
    assert!(out.contains("New page length is 5."));
    assert_eq!(h.repl.session().page_length(), 5);
}

#[test]
fn quoted_semicolon_does_not_end_statement() {
    let mut h = Harness::new(&["insert into t values ('a;", "b');", "\\q"]);
    h.run();
    assert_eq!(h.db.executed(), vec!["insert into t values ('a;\nb')"]);
}

#[test]
fn input_redirect_echoes_lines_then_returns_to_terminal() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "update people").unwrap();
    writeln!(script, "   set active = 't';").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "\\c").unwrap();
    let name = script.path().display().to_string();

    let mut h = Harness::new(&["\\q"]);
    h.repl.redirect_input(&name).unwrap();
    let out = h.run();

    assert!(out.contains(&format!("\nEXECUTE file {name}\n")));
    assert!(out.contains(&format!("{name} >> update people\n")));
    assert!(out.contains(&format!("{name} >>    set active = 't';\n")));
    assert!(out.contains(&format!("{name} >> \\c\n")));
    assert_eq!(h.db.executed(), vec!["update people\n   set active = 't'"]);
    assert_eq!(h.db.commits(), 1);
    assert_eq!(*h.prompts.borrow(), vec!["sqlsh => "]);
}

#[test]
fn missing_input_file_is_reported() {
    let mut h = Harness::new(&["\\i /nonexistent/script.sql", "\\q"]);
    let out = h.run();
    assert!(out.contains("\nCouldn't read from file /nonexistent/script.sql\n"));
    assert!(h.repl.session().input_name().is_none());
}

#[test]
fn failed_nested_input_keeps_reading_current_file() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "\\i /nonexistent/other.sql").unwrap();
    writeln!(script, "delete from people where id = 2;").unwrap();
    let name = script.path().display().to_string();

    let mut h = Harness::new(&["\\q"]);
    h.repl.redirect_input(&name).unwrap();
    let out = h.run();

    assert!(out.contains("\nCouldn't read from file /nonexistent/other.sql\n"));
    assert!(out.contains(&format!("{name} >> delete from people where id = 2;\n")));
    assert_eq!(h.db.executed(), vec!["delete from people where id = 2"]);
    assert_eq!(*h.prompts.borrow(), vec!["sqlsh => "]);
}

proptest! {
    #[test]
    fn text_without_semicolon_stays_incomplete(
        lines in prop::collection::vec("[a-zA-Z0-9 ,()*=]{1,20}", 1..5)
    ) {
        let mut text = String::new();
        for line in &lines {
            text.push_str(line);
            text.push('\n');
            prop_assert!(!is_complete(&text));
        }
        text.push_str(";\n");
        prop_assert!(is_complete(&text));
    }

    #[test]
    fn backslash_lines_are_complete(rest in "[ -~]{0,20}") {
        let line = format!("\\{rest}");
        prop_assert!(is_complete(&line));
    }
}
