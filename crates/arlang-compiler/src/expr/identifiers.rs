//! Variable reads.

use arlang_core::{CompileError, ValueKind};
use arlang_parser::ast::Ident;

use super::{ExprCompiler, Result};

/// Load a bound variable. Variables only ever hold integers.
pub fn compile_ident(compiler: &mut ExprCompiler<'_>, ident: &Ident<'_>) -> Result<ValueKind> {
    let slot = compiler
        .symbols()
        .lookup(ident.name)
        .ok_or_else(|| CompileError::UnknownIdentifier {
            name: ident.name.to_owned(),
            span: ident.span,
        })?;
    compiler.emitter().emit_load(slot)?;
    Ok(ValueKind::Int)
}
