//! Parser state, token navigation and the program entry point.

use arlang_core::{ParseError, ParseErrorKind, Span};
use bumpalo::Bump;
use bumpalo::collections::Vec as BumpVec;
use tracing::trace;

use crate::ast::{Program, ProgramBody};

/// How deeply parentheses and loop bodies may nest.
pub const MAX_NESTING: u32 = 256;
use crate::lexer::{Lexer, Token, TokenKind};

/// Recursive-descent parser for ArLang.
///
/// The whole source is tokenized up front. Parsing stops at the first
/// error, so there is no recovery or synchronization machinery.
pub struct Parser<'ast> {
    /// Buffered tokens, always terminated by `Eof`.
    pub(super) buffer: Vec<Token<'ast>>,
    pub(super) position: usize,
    /// Open parentheses and loop bodies around the current token.
    pub(super) depth: u32,
    /// The first lexer failure, reported when parsing reaches its token.
    lex_error: Option<ParseError>,
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Tokenize `source` into a new parser.
    ///
    /// Tokenization stops at the first lexer error; an `Eof` token is placed
    /// right after the error token so lookahead never runs off the buffer.
    pub fn new(source: &str, arena: &'ast Bump) -> Self {
        let mut lexer = Lexer::new(source, arena);
        let mut buffer = Vec::new();
        let mut lex_error = None;

        loop {
            let token = lexer.next_token();
            buffer.push(token);
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Error => {
                    lex_error = lexer.take_errors().into_iter().next().map(ParseError::from);
                    buffer.push(Token::new(TokenKind::Eof, "", token.span));
                    break;
                }
                _ => {}
            }
        }

        trace!(tokens = buffer.len(), "tokenized source");

        Self {
            buffer,
            position: 0,
            depth: 0,
            lex_error,
            arena,
        }
    }

    /// Parse a complete program.
    ///
    /// A program is either one expression (legacy mode, whose value is
    /// printed) or a sequence of statements. Mixing the two is a syntax error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<Program<'ast>, ParseError> {
        let mut parser = Parser::new(source, arena);
        let result = parser.parse_program();
        result.map_err(|err| match parser.lex_error.take() {
            Some(lex) if lex.span == err.span => lex,
            _ => err,
        })
    }

    fn parse_program(&mut self) -> Result<Program<'ast>, ParseError> {
        let span = self.peek().span;

        if self.is_eof() || self.starts_statement() {
            let mut stmts = BumpVec::new_in(self.arena);
            while !self.is_eof() {
                stmts.push(self.parse_statement()?);
            }
            return Ok(Program {
                body: ProgramBody::Statements(stmts.into_bump_slice()),
                span,
            });
        }

        let expr = self.parse_expr(0)?;
        if !self.is_eof() {
            let token = *self.peek();
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                token.span,
                format!(
                    "expected end of input after the program expression, found {}",
                    token.kind
                ),
            ));
        }

        Ok(Program {
            body: ProgramBody::Expression(expr),
            span: expr.span(),
        })
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    pub fn peek(&self) -> &Token<'ast> {
        &self.buffer[self.position]
    }

    /// Peek ahead n tokens, clamped to the trailing `Eof`.
    pub fn peek_nth(&self, n: usize) -> &Token<'ast> {
        let index = (self.position + n).min(self.buffer.len() - 1);
        &self.buffer[index]
    }

    /// Consume the current token. Never moves past `Eof`.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = self.buffer[self.position];
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                format!("expected {kind}, found end of input"),
            ))
        } else {
            Err(ParseError::expected_token(
                token.span,
                kind.description(),
                token.kind.description(),
            ))
        }
    }

    /// Whether the upcoming tokens begin a statement rather than an expression.
    pub(super) fn starts_statement(&self) -> bool {
        let token = self.peek();
        token.kind.is_statement_keyword()
            || (token.kind == TokenKind::Identifier
                && self.peek_nth(1).kind == TokenKind::Equal)
    }

    /// Run `parse` one nesting level deeper, failing at `open` once the
    /// limit is reached.
    pub(super) fn nested<T>(
        &mut self,
        open: Span,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                open,
                format!("nesting exceeds {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(super) fn span_since(&self, start: Span) -> Span {
        let end = self.buffer[self.position.saturating_sub(1)].span;
        start.merge(end)
    }
}
