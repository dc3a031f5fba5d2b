//! Scripted editor and captured output shared by the runtime tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;

use sqlsh_driver::{MemoryConnection, MemoryHandle};
use sqlsh_foundation::Result;
use sqlsh_runtime::{LineEditor, ReadResult, Repl, Session};

/// Editor that replays fixed lines, then reports end of input.
pub struct ScriptedEditor {
    lines: VecDeque<String>,
    pub prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedEditor {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            prompts: Rc::default(),
        }
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self
            .lines
            .pop_front()
            .map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

/// Output buffer that can be inspected after the REPL took ownership.
#[derive(Clone, Default)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Output whose every write fails, like stdout piped into a closed reader.
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
}

/// A REPL over the demo catalog with scripted input and captured output.
pub struct Harness {
    pub repl: Repl<ScriptedEditor>,
    pub out: Captured,
    pub db: MemoryHandle,
    pub prompts: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn new(lines: &[&str]) -> Self {
        let conn = MemoryConnection::demo();
        let db = conn.handle();
        let editor = ScriptedEditor::new(lines);
        let prompts = Rc::clone(&editor.prompts);
        let out = Captured::default();
        let repl = Repl::with_editor(editor, Session::new(Box::new(conn)))
            .with_output(Box::new(out.clone()))
            .without_banner();
        Self {
            repl,
            out,
            db,
            prompts,
        }
    }

    /// Runs the loop to completion and returns everything it printed.
    pub fn run(&mut self) -> String {
        self.repl.run().unwrap();
        self.out.text()
    }
}
