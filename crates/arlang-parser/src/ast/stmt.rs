//! Statement AST nodes.

use crate::ast::expr::{Expr, Ident};
use arlang_core::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `name = value;`
    Assign(AssignStmt<'ast>),
    /// `print value;`
    Print(PrintStmt<'ast>),
    /// `for (...) { ... }`
    For(&'ast ForStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Assign(s) => s.span,
            Self::Print(s) => s.span,
            Self::For(s) => s.span,
        }
    }

    /// Name of the statement kind, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Assign(_) => "an assignment",
            Self::Print(_) => "a print statement",
            Self::For(_) => "a for loop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub target: Ident<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintStmt<'ast> {
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// A conditional counting loop.
///
/// Two surface forms exist:
///
/// ```text
/// for (i = 1; i < 4) { print i; }   counter form: `init` seeds the counter
/// for (1 < 4) { print 7; }          bare form: `condition.left` seeds it
/// ```
///
/// In counter form the parser guarantees `condition` is a binary expression
/// whose left operand is the counter identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    pub counter: Option<Ident<'ast>>,
    pub init: Option<&'ast Expr<'ast>>,
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}
