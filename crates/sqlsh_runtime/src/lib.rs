//! REPL, meta-commands, rendering, and CLI for sqlsh.
//!
//! This crate provides:
//! - [`Repl`] - The interactive read-dispatch-render loop
//! - [`Session`] - Connection, autocommit, redirection, and pagination state
//! - [`MetaCommand`] - Classification of backslash commands
//! - Result rendering as paginated ASCII tables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod input;
pub mod render;
pub mod repl;
pub mod session;
pub mod table;

pub use command::MetaCommand;
pub use config::ShellConfig;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use input::{Origin, Prompts, ReadOutcome, Statement};
pub use repl::{Flow, Repl};
pub use session::{Autocommit, DEFAULT_PAGE_LENGTH, Session};
