//! Print statement compilation.

use arlang_parser::ast::PrintStmt;

use super::{Result, StmtCompiler};

impl<'a> StmtCompiler<'a> {
    /// Compile `print value;`.
    pub fn compile_print(&mut self, print: &PrintStmt<'_>) -> Result<()> {
        let kind = self.expr_compiler().compile(print.value)?;
        self.emitter.emit_print(kind)
    }
}
