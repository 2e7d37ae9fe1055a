//! Literal compilation.

use arlang_core::{Literal, ValueKind};
use arlang_parser::ast::{LiteralExpr, LiteralKind};

use super::{ExprCompiler, Result};

/// Push a literal. Integers are narrowed to 32 bits here.
pub fn compile_literal(
    compiler: &mut ExprCompiler<'_>,
    literal: &LiteralExpr<'_>,
) -> Result<ValueKind> {
    let value = match literal.kind {
        LiteralKind::Int(value) => Literal::integer(value, literal.span)?,
        LiteralKind::Text(text) => Literal::text(text),
    };
    compiler.emitter().emit_literal(&value)?;
    Ok(value.kind())
}
