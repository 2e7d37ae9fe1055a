//! Expression AST nodes.
//!
//! Unary minus never appears here: the parser folds `-5` into a signed
//! [`LiteralExpr`] before the tree is handed on.

use crate::ast::BinaryOp;
use arlang_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    Literal(LiteralExpr<'ast>),
    Ident(Ident<'ast>),
    Binary(&'ast BinaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
        }
    }

    /// The binary node, if this is one.
    pub fn as_binary(&self) -> Option<&'ast BinaryExpr<'ast>> {
        match *self {
            Self::Binary(binary) => Some(binary),
            _ => None,
        }
    }
}

/// A literal value as written in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind<'ast> {
    /// Signed integer, not yet narrowed to the runtime width.
    Int(i64),
    /// Decoded text without quotes.
    Text(&'ast str),
}

/// A variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// `left op right`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}
