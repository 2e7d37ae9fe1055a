//! Expression compiler.
//!
//! The [`ExprCompiler`] walks an expression depth-first, left operand before
//! right, and leaves its value on the operand stack.

mod binary;
mod identifiers;
mod literals;

use arlang_core::{CompileError, ValueKind};
use arlang_parser::ast::{Expr, LiteralExpr, LiteralKind};

use crate::emit::Emitter;
use crate::scope::SymbolTable;

type Result<T> = std::result::Result<T, CompileError>;

/// Compiles expressions into pushes and arithmetic.
pub struct ExprCompiler<'a> {
    emitter: &'a mut Emitter,
    symbols: &'a SymbolTable,
}

impl<'a> ExprCompiler<'a> {
    pub fn new(emitter: &'a mut Emitter, symbols: &'a SymbolTable) -> Self {
        Self { emitter, symbols }
    }

    /// Emit `expr` and report what kind of value it left on the stack.
    pub fn compile(&mut self, expr: &Expr<'_>) -> Result<ValueKind> {
        match expr {
            Expr::Literal(literal) => literals::compile_literal(self, literal),
            Expr::Ident(ident) => identifiers::compile_ident(self, ident),
            Expr::Binary(binary) => binary::compile_binary(self, binary),
        }
    }

    /// Emit `expr`, which must produce an integer.
    pub fn compile_int(&mut self, expr: &Expr<'_>) -> Result<()> {
        if let Expr::Literal(LiteralExpr {
            kind: LiteralKind::Text(_),
            span,
        }) = expr
        {
            return Err(CompileError::TextOperand { span: *span });
        }
        match self.compile(expr)? {
            ValueKind::Int => Ok(()),
            ValueKind::Text => Err(CompileError::TextOperand { span: expr.span() }),
        }
    }

    pub(crate) fn emitter(&mut self) -> &mut Emitter {
        &mut *self.emitter
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        self.symbols
    }
}
