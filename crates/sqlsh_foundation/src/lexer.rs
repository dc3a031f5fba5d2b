//! Quote-aware SQL tokenizer.
//!
//! This is not a SQL parser. It only splits text far enough to tell quoted
//! strings, quoted identifiers, comments, and `?` placeholders apart from
//! everything else, which is what statement completeness, parameter binding,
//! and highlighting need.
//!
//! Tokens borrow from the source and concatenate back to it exactly.

/// Kind of a lexical token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of whitespace.
    Whitespace,
    /// A run of ordinary characters (words, operators, punctuation).
    Text,
    /// A `'...'` string literal.
    String,
    /// A `"..."` quoted identifier.
    QuotedIdent,
    /// A `-- ...` comment, up to but not including the newline.
    LineComment,
    /// A `/* ... */` comment.
    BlockComment,
    /// A `?` bind placeholder.
    Placeholder,
}

/// A token with its source slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    /// The token kind.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: &'src str,
    /// Byte offset of the token in the source.
    pub offset: usize,
    /// False for a string, identifier, or block comment that hit end of input.
    pub terminated: bool,
}

impl Token<'_> {
    /// Returns true for whitespace.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace)
    }
}

/// Lexer over SQL source text.
pub struct Lexer<'src> {
    source: &'src str,
    position: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.position..]
    }

    fn token(&mut self, kind: TokenKind, len: usize, terminated: bool) -> Token<'src> {
        let start = self.position;
        self.position += len;
        Token {
            kind,
            text: &self.source[start..self.position],
            offset: start,
            terminated,
        }
    }

    fn scan_whitespace(&mut self) -> Token<'src> {
        let len = self
            .rest()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.rest().len());
        self.token(TokenKind::Whitespace, len, true)
    }

    fn scan_quoted(&mut self, quote: char, kind: TokenKind) -> Token<'src> {
        let rest = self.rest();
        let mut chars = rest.char_indices().skip(1).peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                chars.next();
            } else if c == quote {
                // A doubled quote is an escaped quote, not the end.
                if chars.peek().is_some_and(|&(_, next)| next == quote) {
                    chars.next();
                } else {
                    return self.token(kind, i + c.len_utf8(), true);
                }
            }
        }
        self.token(kind, rest.len(), false)
    }

    fn scan_line_comment(&mut self) -> Token<'src> {
        let len = self.rest().find('\n').unwrap_or(self.rest().len());
        self.token(TokenKind::LineComment, len, true)
    }

    fn scan_block_comment(&mut self) -> Token<'src> {
        match self.rest()[2..].find("*/") {
            Some(i) => self.token(TokenKind::BlockComment, i + 4, true),
            None => {
                let len = self.rest().len();
                self.token(TokenKind::BlockComment, len, false)
            }
        }
    }

    fn scan_text(&mut self) -> Token<'src> {
        let rest = self.rest();
        let mut len = rest.len();
        for (i, c) in rest.char_indices() {
            if i > 0 && starts_special(&rest[i..]) {
                len = i;
                break;
            }
            if c.is_whitespace() {
                len = i;
                break;
            }
        }
        self.token(TokenKind::Text, len, true)
    }
}

/// Returns true if `s` begins a token other than `Text`.
fn starts_special(s: &str) -> bool {
    s.starts_with(['\'', '"', '?']) || s.starts_with("--") || s.starts_with("/*")
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        let rest = self.rest();
        let c = rest.chars().next()?;
        let token = match c {
            c if c.is_whitespace() => self.scan_whitespace(),
            '\'' => self.scan_quoted('\'', TokenKind::String),
            '"' => self.scan_quoted('"', TokenKind::QuotedIdent),
            '?' => self.token(TokenKind::Placeholder, 1, true),
            '-' if rest.starts_with("--") => self.scan_line_comment(),
            '/' if rest.starts_with("/*") => self.scan_block_comment(),
            _ => self.scan_text(),
        };
        Some(token)
    }
}

/// Tokenizes the whole source.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

/// Returns the last token that is not whitespace.
#[must_use]
pub fn last_significant(source: &str) -> Option<Token<'_>> {
    Lexer::new(source).filter(|t| !t.is_whitespace()).last()
}
