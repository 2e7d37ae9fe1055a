//! Arithmetic expressions.

use arlang_core::{CompileError, ValueKind};
use arlang_parser::ast::BinaryExpr;

use super::{ExprCompiler, Result};

/// Emit `left`, then `right`, then the operator.
///
/// Comparisons are only meaningful as a loop guard and are rejected here
/// before anything is emitted.
///
/// Left-nested chains such as `1 + 2 + 3 + ...` are walked with an explicit
/// spine rather than by recursion, so their length is not bounded by the
/// native stack. Right operands nest only through parentheses, which the
/// parser limits.
pub fn compile_binary(
    compiler: &mut ExprCompiler<'_>,
    binary: &BinaryExpr<'_>,
) -> Result<ValueKind> {
    let mut spine = vec![binary];
    let mut leftmost = binary.left;
    while let Some(inner) = leftmost.as_binary() {
        spine.push(inner);
        leftmost = inner.left;
    }

    if let Some(node) = spine.iter().find(|node| !node.op.is_arithmetic()) {
        return Err(CompileError::UnsupportedOperator {
            op: node.op.to_string(),
            span: node.span,
        });
    }

    compiler.compile_int(leftmost)?;
    for node in spine.iter().rev() {
        compiler.compile_int(node.right)?;
        compiler.emitter().emit_binary_op(node.op)?;
    }
    Ok(ValueKind::Int)
}
