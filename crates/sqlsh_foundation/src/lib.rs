//! Core values, coercion, lexing, and errors for sqlsh.
//!
//! This crate provides:
//! - [`Value`] - Typed values produced by coercion and returned in rows
//! - [`coerce`] - Best-effort conversion of text into typed values
//! - [`lexer`] - Quote-aware SQL tokenizer
//! - [`bind`] - Placeholder substitution for literal parameters
//! - [`Error`] - Error types with optional context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bind;
pub mod coerce;
pub mod error;
pub mod lexer;
pub mod types;
pub mod value;

pub use bind::{bind, quote};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use types::SqlType;
pub use value::Value;
