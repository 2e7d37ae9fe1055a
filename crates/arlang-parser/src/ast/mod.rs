//! Abstract Syntax Tree (AST) for ArLang.
//!
//! All nodes are allocated in a [`bumpalo::Bump`] arena and borrow from it.
//!
//! # Example
//!
//! ```
//! use arlang_parser::Parser;
//! use arlang_parser::ast::{Expr, ProgramBody};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("11 * 22", &arena).unwrap();
//! assert!(matches!(program.body, ProgramBody::Expression(Expr::Binary(_))));
//! ```

pub mod ops;

mod parser;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub use expr::*;
pub use ops::*;
pub use parser::{MAX_NESTING, Parser};
pub use stmt::*;

use arlang_core::Span;

/// A parsed ArLang program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub body: ProgramBody<'ast>,
    pub span: Span,
}

/// The two program forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgramBody<'ast> {
    /// Legacy single-expression mode; the value is printed once.
    Expression(&'ast Expr<'ast>),
    /// Statements in source order. Empty when the source has no tokens.
    Statements(&'ast [Stmt<'ast>]),
}

impl<'ast> Program<'ast> {
    pub fn is_expression(&self) -> bool {
        matches!(self.body, ProgramBody::Expression(_))
    }

    /// The statements, or an empty slice in expression mode.
    pub fn statements(&self) -> &'ast [Stmt<'ast>] {
        match self.body {
            ProgramBody::Statements(stmts) => stmts,
            ProgramBody::Expression(_) => &[],
        }
    }
}
