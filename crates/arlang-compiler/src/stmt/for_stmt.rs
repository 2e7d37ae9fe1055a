//! For loop compilation.

use arlang_core::CompileError;
use arlang_parser::ast::{ForStmt, Stmt};

use super::{Result, StmtCompiler};
use crate::emit::negated_branch;

impl<'a> StmtCompiler<'a> {
    /// Compile a counting loop.
    ///
    /// The loop variable lives in a fresh slot, seeded from the initializer
    /// in counter form or from the condition's left operand otherwise. It is
    /// tested before every iteration and incremented by one after it.
    ///
    /// Bytecode layout:
    /// ```text
    /// [init]
    /// ISTORE slot
    /// top:
    /// ILOAD slot
    /// [rhs]
    /// IF_ICMPxx -> exit      negation of the condition
    /// [body]
    /// IINC slot 1
    /// GOTO top
    /// exit:
    /// ```
    pub fn compile_for(&mut self, for_stmt: &ForStmt<'_>) -> Result<()> {
        let condition = for_stmt.condition.as_binary().ok_or_else(|| {
            CompileError::InvalidLoopCondition {
                op: "none".into(),
                span: for_stmt.condition.span(),
            }
        })?;
        if negated_branch(condition.op).is_none() {
            return Err(CompileError::InvalidLoopCondition {
                op: condition.op.to_string(),
                span: condition.span,
            });
        }
        if let Some(stmt) = for_stmt.body.iter().find(|s| !matches!(s, Stmt::Print(_))) {
            return Err(CompileError::UnsupportedLoopBody {
                statement: stmt.describe().into(),
                span: stmt.span(),
            });
        }

        let init = for_stmt.init.unwrap_or(condition.left);
        self.expr_compiler().compile_int(init)?;
        let slot = self.emitter.declare_slot()?;
        self.emitter.emit_store(slot)?;
        if let Some(counter) = for_stmt.counter {
            self.symbols.bind(counter.name, slot);
        }

        let label = self.emitter.begin_loop()?;
        self.emitter.emit_load(slot)?;
        self.expr_compiler().compile_int(condition.right)?;
        self.emitter.emit_loop_guard(condition.op, label)?;

        for stmt in for_stmt.body {
            if let Stmt::Print(print) = stmt {
                self.compile_print(print)?;
            }
        }

        self.emitter.emit_increment(slot, 1)?;
        self.emitter.emit_loop_back(label)?;
        self.emitter.end_loop(label)
    }
}
