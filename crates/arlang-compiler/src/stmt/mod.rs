//! Statement compiler.
//!
//! The [`StmtCompiler`] handles the three statement kinds:
//! - assignments, which bind a name to a slot on first use
//! - print statements
//! - counting for loops, whose bodies may only print

mod assign;
mod for_stmt;
mod print_stmt;

use arlang_core::CompileError;
use arlang_parser::ast::Stmt;

use crate::emit::Emitter;
use crate::expr::ExprCompiler;
use crate::scope::SymbolTable;

type Result<T> = std::result::Result<T, CompileError>;

/// Compiles statements in source order.
pub struct StmtCompiler<'a> {
    emitter: &'a mut Emitter,
    symbols: &'a mut SymbolTable,
}

impl<'a> StmtCompiler<'a> {
    pub fn new(emitter: &'a mut Emitter, symbols: &'a mut SymbolTable) -> Self {
        Self { emitter, symbols }
    }

    /// Compile a statement.
    pub fn compile(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Assign(assign) => self.compile_assign(assign),
            Stmt::Print(print) => self.compile_print(print),
            Stmt::For(for_stmt) => self.compile_for(for_stmt),
        }
    }

    fn expr_compiler(&mut self) -> ExprCompiler<'_> {
        ExprCompiler::new(self.emitter, self.symbols)
    }
}
