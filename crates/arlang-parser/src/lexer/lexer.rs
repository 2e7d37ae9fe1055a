//! Main lexer implementation for ArLang.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s, dispatching
//! on the first character of each token. Lexemes are copied into the arena so
//! the source string can be dropped once tokenization is done.

use arlang_core::{LexError, Span};
use bumpalo::Bump;

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for ArLang source code.
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    errors: Vec<LexError>,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Scan and return the next token. Returns `Eof` forever once input ends.
    pub fn next_token(&mut self) -> Token<'ast> {
        loop {
            self.cursor.eat_while(|c| c.is_ascii_whitespace());

            let start = (self.cursor.line(), self.cursor.column(), self.cursor.offset());
            let Some(c) = self.cursor.peek() else {
                return self.make_eof();
            };

            return match c {
                '/' if self.cursor.peek_nth(1) == Some('/') => {
                    self.cursor.eat_while(|c| c != '\n');
                    continue;
                }
                '/' if self.cursor.peek_nth(1) == Some('*') => match self.skip_block_comment(start) {
                    Ok(()) => continue,
                    Err(error) => self.make_error(error),
                },
                '"' => self.scan_string(start),
                c if c.is_ascii_digit() => {
                    self.cursor.eat_while(|c| c.is_ascii_digit());
                    self.make_token(TokenKind::IntLiteral, start)
                }
                c if is_ident_start(c) => {
                    let lexeme = self.cursor.eat_while(is_ident_continue);
                    let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
                    self.make_token(kind, start)
                }
                _ => self.scan_operator(start),
            };
        }
    }

    // =========================================
    // Token construction
    // =========================================

    fn make_eof(&self) -> Token<'ast> {
        let span = Span::point(self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, "", span)
    }

    fn make_token(&self, kind: TokenKind, (line, col, offset): (u32, u32, u32)) -> Token<'ast> {
        let lexeme = self.cursor.slice_from(offset);
        let span = Span::new(line, col, lexeme.len() as u32);
        Token::new(kind, self.arena.alloc_str(lexeme), span)
    }

    fn make_error(&mut self, error: LexError) -> Token<'ast> {
        let span = error.span();
        self.errors.push(error);
        Token::new(TokenKind::Error, "", span)
    }

    fn span_from(&self, (line, col, offset): (u32, u32, u32)) -> Span {
        Span::new(line, col, self.cursor.offset() - offset)
    }

    // =========================================
    // Scanning
    // =========================================

    fn skip_block_comment(&mut self, start: (u32, u32, u32)) -> Result<(), LexError> {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None => {
                    return Err(LexError::UnterminatedComment {
                        span: self.span_from(start),
                    });
                }
                Some('*') if self.cursor.eat('/') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Scan a double-quoted string. Escapes are validated here and decoded by
    /// [`decode_text`] when the parser builds the literal.
    fn scan_string(&mut self, start: (u32, u32, u32)) -> Token<'ast> {
        self.cursor.advance();

        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    return self.make_error(LexError::UnterminatedString { span });
                }
                Some('"') => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::StringLiteral, start);
                }
                Some('\\') => {
                    let (line, col) = (self.cursor.line(), self.cursor.column());
                    self.cursor.advance();
                    match self.cursor.advance() {
                        Some(ch) if escape_value(ch).is_some() => {}
                        Some(ch) => {
                            let span = Span::new(line, col, 1 + ch.len_utf8() as u32);
                            return self.make_error(LexError::InvalidEscape { ch, span });
                        }
                        None => {
                            let span = self.span_from(start);
                            return self.make_error(LexError::UnterminatedString { span });
                        }
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn scan_operator(&mut self, start: (u32, u32, u32)) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' if self.cursor.eat('=') => TokenKind::EqualEqual,
            '=' => TokenKind::Equal,
            '<' if self.cursor.eat('=') => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if self.cursor.eat('=') => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            ch => {
                let span = self.span_from(start);
                return self.make_error(LexError::UnexpectedChar { ch, span });
            }
        };

        self.make_token(kind, start)
    }
}

fn escape_value(ch: char) -> Option<char> {
    match ch {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Strip the quotes from a string lexeme and decode its escapes.
///
/// Expects a lexeme the lexer accepted; an unknown escape is kept verbatim.
pub fn decode_text(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) => match escape_value(escaped) {
                Some(value) => text.push(value),
                None => {
                    text.push('\\');
                    text.push(escaped);
                }
            },
            None => text.push('\\'),
        }
    }
    text
}
