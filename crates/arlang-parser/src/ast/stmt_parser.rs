//! Statement parsing.

use super::parser::Parser;
use crate::ast::expr::{Expr, Ident};
use crate::ast::stmt::*;
use crate::lexer::TokenKind;
use arlang_core::{ParseError, ParseErrorKind};
use bumpalo::collections::Vec as BumpVec;

impl<'ast> Parser<'ast> {
    /// Parse a statement.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::Print => self.parse_print(),
            TokenKind::For => self.parse_for(),
            TokenKind::Identifier if self.peek_nth(1).kind == TokenKind::Equal => {
                self.parse_assign()
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span)),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedStatement,
                token.span,
                format!("expected statement, found {}", token.kind),
            )),
        }
    }

    /// Parse `name = value;`.
    fn parse_assign(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expr(0)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Stmt::Assign(AssignStmt {
            target: Ident::new(name.lexeme, name.span),
            value,
            span: self.span_since(name.span),
        }))
    }

    /// Parse `print value;`.
    fn parse_print(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let keyword = self.expect(TokenKind::Print)?;
        let value = self.parse_expr(0)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Stmt::Print(PrintStmt {
            value,
            span: self.span_since(keyword.span),
        }))
    }

    /// Parse a for loop.
    ///
    /// ```text
    /// for ( [IDENT = expr ;] condition ) { statement* }
    /// ```
    ///
    /// Only the counter's spelling is checked here. Whether the condition's
    /// operator is one a loop can test is left to code generation.
    fn parse_for(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let keyword = self.expect(TokenKind::For)?;
        self.expect(TokenKind::LeftParen)?;

        let (counter, init) = if self.check(TokenKind::Identifier)
            && self.peek_nth(1).kind == TokenKind::Equal
        {
            let name = self.advance();
            self.advance();
            let init = self.parse_expr(0)?;
            self.expect(TokenKind::Semicolon)?;
            (Some(Ident::new(name.lexeme, name.span)), Some(init))
        } else {
            (None, None)
        };

        let condition = self.parse_expr(0)?;
        if let Some(counter) = counter {
            let tests_counter = condition.as_binary().is_some_and(
                |binary| matches!(binary.left, Expr::Ident(ident) if ident.name == counter.name),
            );
            if !tests_counter {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidStatement,
                    condition.span(),
                    format!("loop condition must test the counter '{}'", counter.name),
                ));
            }
        }
        self.expect(TokenKind::RightParen)?;

        let brace = self.expect(TokenKind::LeftBrace)?;
        let body = self.nested(brace.span, |parser| {
            let mut body = BumpVec::new_in(parser.arena);
            while !parser.check(TokenKind::RightBrace) {
                body.push(parser.parse_statement()?);
            }
            parser.expect(TokenKind::RightBrace)?;
            Ok(body)
        })?;

        let for_stmt = self.arena.alloc(ForStmt {
            counter,
            init,
            condition,
            body: body.into_bump_slice(),
            span: self.span_since(keyword.span),
        });
        Ok(Stmt::For(for_stmt))
    }
}
