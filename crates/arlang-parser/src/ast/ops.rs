//! Binary operators and their precedence.

use crate::lexer::TokenKind;
use std::fmt;

/// Binary operators in ArLang, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Equality
    /// `==`
    Eq,

    // Relational
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,

    // Additive
    /// `+`
    Add,
    /// `-`
    Sub,

    // Multiplicative
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Binding power as `(left_bp, right_bp)`; every operator is left-associative.
    pub fn binding_power(&self) -> (u8, u8) {
        use BinaryOp::*;
        match self {
            Eq => (1, 2),
            Lt | Lte | Gt | Gte => (3, 4),
            Add | Sub => (5, 6),
            Mul | Div => (7, 8),
        }
    }

    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use BinaryOp::*;
        Some(match kind {
            TokenKind::EqualEqual => Eq,
            TokenKind::Less => Lt,
            TokenKind::LessEqual => Lte,
            TokenKind::Greater => Gt,
            TokenKind::GreaterEqual => Gte,
            TokenKind::Plus => Add,
            TokenKind::Minus => Sub,
            TokenKind::Star => Mul,
            TokenKind::Slash => Div,
            _ => return None,
        })
    }

    /// `+ - * /`
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    /// `< <= > >=`, the operators a for-loop condition accepts.
    pub fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte)
    }

    pub fn as_str(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            Eq => "==",
            Lt => "<",
            Lte => "<=",
            Gt => ">",
            Gte => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
