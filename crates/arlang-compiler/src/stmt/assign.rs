//! Assignment compilation.

use arlang_parser::ast::AssignStmt;

use super::{Result, StmtCompiler};

impl<'a> StmtCompiler<'a> {
    /// Compile `name = value;`.
    ///
    /// The value is emitted first. A name seen for the first time gets the
    /// next slot; later assignments overwrite that slot.
    pub fn compile_assign(&mut self, assign: &AssignStmt<'_>) -> Result<()> {
        self.expr_compiler().compile_int(assign.value)?;

        let slot = match self.symbols.lookup(assign.target.name) {
            Some(slot) => slot,
            None => {
                let slot = self.emitter.declare_slot()?;
                self.symbols.bind(assign.target.name, slot);
                slot
            }
        };
        self.emitter.emit_store(slot)
    }
}
