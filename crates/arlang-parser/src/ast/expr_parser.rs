//! Expression parsing using precedence climbing.

use super::parser::Parser;
use crate::ast::expr::*;
use crate::ast::BinaryOp;
use crate::lexer::{TokenKind, decode_text};
use arlang_core::{ParseError, ParseErrorKind, Span};

impl<'ast> Parser<'ast> {
    /// Parse an expression whose operators bind at least as tightly as `min_bp`.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(op) = BinaryOp::from_token(self.peek().kind) {
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }

            self.advance();
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = self.arena.alloc(Expr::Binary(self.arena.alloc(BinaryExpr {
                left: lhs,
                op,
                right: rhs,
                span,
            })));
        }

        Ok(lhs)
    }

    /// Parse the start of an expression: a literal, an identifier, a
    /// sign-folded literal, or a parenthesised expression.
    fn parse_prefix(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                let value = parse_int(token.lexeme, false, token.span)?;
                Ok(self.alloc_int(value, token.span))
            }

            // `-5` becomes one signed literal node; nothing else may follow a sign
            TokenKind::Minus => {
                self.advance();
                let Some(digits) = self.eat(TokenKind::IntLiteral) else {
                    return Err(ParseError::new(
                        ParseErrorKind::ExpectedExpression,
                        token.span,
                        "unary '-' can only prefix an integer literal",
                    ));
                };
                let span = token.span.merge(digits.span);
                let value = parse_int(digits.lexeme, true, span)?;
                Ok(self.alloc_int(value, span))
            }

            TokenKind::StringLiteral => {
                self.advance();
                let text = self.arena.alloc_str(&decode_text(token.lexeme));
                Ok(self.arena.alloc(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Text(text),
                    span: token.span,
                })))
            }

            TokenKind::Identifier => {
                self.advance();
                Ok(self
                    .arena
                    .alloc(Expr::Ident(Ident::new(token.lexeme, token.span))))
            }

            TokenKind::LeftParen => {
                self.advance();
                self.nested(token.span, |parser| {
                    let inner = parser.parse_expr(0)?;
                    parser.expect(TokenKind::RightParen)?;
                    Ok(inner)
                })
            }

            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span)),

            _ => Err(ParseError::expected_expression(
                token.span,
                token.kind.description(),
            )),
        }
    }

    fn alloc_int(&self, value: i64, span: Span) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Literal(LiteralExpr {
            kind: LiteralKind::Int(value),
            span,
        }))
    }
}

fn parse_int(digits: &str, negative: bool, span: Span) -> Result<i64, ParseError> {
    let parsed = if negative {
        format!("-{digits}").parse::<i64>()
    } else {
        digits.parse::<i64>()
    };
    parsed.map_err(|_| {
        ParseError::new(
            ParseErrorKind::InvalidLiteral,
            span,
            format!("integer literal '{digits}' is too large"),
        )
    })
}
