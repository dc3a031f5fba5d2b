//! Syntax highlighting for the REPL.

use std::borrow::Cow;

use sqlsh_foundation::{TokenKind, tokenize};

use crate::render::SQL_KEYWORDS;

const RESET: &str = "\x1b[0m";
const KEYWORD: &str = "\x1b[1;34m";
const STRING: &str = "\x1b[33m";
const IDENT: &str = "\x1b[36m";
const NUMBER: &str = "\x1b[35m";
const COMMENT: &str = "\x1b[2;3m";
const PLACEHOLDER: &str = "\x1b[1;33m";
const META: &str = "\x1b[36m";

/// Highlighter for SQL statements and meta-commands.
pub struct SqlHighlighter;

impl SqlHighlighter {
    /// Creates a new highlighter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim_start().starts_with('\\') {
            return Cow::Owned(format!("{META}{line}{RESET}"));
        }

        let mut result = String::with_capacity(line.len() * 2);
        for token in tokenize(line) {
            let color = match token.kind {
                TokenKind::Whitespace => None,
                TokenKind::String => Some(STRING),
                TokenKind::QuotedIdent => Some(IDENT),
                TokenKind::LineComment | TokenKind::BlockComment => Some(COMMENT),
                TokenKind::Placeholder => Some(PLACEHOLDER),
                TokenKind::Text => {
                    highlight_words(token.text, &mut result);
                    continue;
                }
            };
            match color {
                Some(color) => {
                    result.push_str(color);
                    result.push_str(token.text);
                    result.push_str(RESET);
                }
                None => result.push_str(token.text),
            }
        }
        Cow::Owned(result)
    }
}

impl Default for SqlHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors keywords and numbers inside a run of ordinary text.
fn highlight_words(text: &str, result: &mut String) {
    let mut rest = text;
    while !rest.is_empty() {
        let word_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());

        if word_len == 0 {
            let punct_len = rest.chars().next().map_or(1, char::len_utf8);
            result.push_str(&rest[..punct_len]);
            rest = &rest[punct_len..];
            continue;
        }

        let word = &rest[..word_len];
        if is_keyword(word) {
            push_colored(result, KEYWORD, word);
        } else if word.starts_with(|c: char| c.is_ascii_digit()) {
            push_colored(result, NUMBER, word);
        } else {
            result.push_str(word);
        }
        rest = &rest[word_len..];
    }
}

fn is_keyword(word: &str) -> bool {
    SQL_KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

fn push_colored(result: &mut String, color: &str, text: &str) {
    result.push_str(color);
    result.push_str(text);
    result.push_str(RESET);
}
