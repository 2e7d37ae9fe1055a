//! ArLang code generator.
//!
//! Turns a parsed [`Program`] into a JVM class whose static `main` runs it.
//!
//! ## Modules
//!
//! - [`bytecode`]: opcodes, the code array and the constant pool
//! - [`emit`]: the instruction emitter that owns all output state
//! - [`expr`]: expression compiler
//! - [`stmt`]: statement compiler
//! - [`scope`]: variable name to slot bindings
//! - [`module`]: the finished class file
//!
//! # Example
//!
//! ```
//! use arlang_compiler::Compiler;
//! use arlang_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("x = 5; print x;", &arena).unwrap();
//! let module = Compiler::compile_program(&program, "Program").unwrap();
//! assert_eq!(module.file_name(), "Program.class");
//! ```

pub mod bytecode;
pub mod emit;
pub mod expr;
pub mod module;
pub mod scope;
pub mod stmt;

pub use emit::{Emitter, LoopLabel, Slot};
pub use expr::ExprCompiler;
pub use module::Module;
pub use scope::SymbolTable;
pub use stmt::StmtCompiler;

pub use arlang_core::CompileError;

use arlang_parser::ast::{Program, ProgramBody};
use tracing::{debug, trace};

/// Entry point of code generation.
pub struct Compiler;

impl Compiler {
    /// Compile `program` into class `class_name`.
    ///
    /// An expression program prints its value once. A statement program runs
    /// its statements in order and prints nothing implicitly. Compilation
    /// stops at the first error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_program(program: &Program<'_>, class_name: &str) -> Result<Module, CompileError> {
        let mut emitter = Emitter::new();
        let mut symbols = SymbolTable::new();
        emitter.begin(class_name)?;

        match program.body {
            ProgramBody::Expression(expr) => {
                debug!("compiling expression program");
                let kind = ExprCompiler::new(&mut emitter, &symbols).compile(expr)?;
                emitter.emit_print(kind)?;
            }
            ProgramBody::Statements([]) => {
                return Err(CompileError::UnknownConstruct {
                    construct: "empty program".into(),
                    span: program.span,
                });
            }
            ProgramBody::Statements(stmts) => {
                debug!(statements = stmts.len(), "compiling statement program");
                let mut compiler = StmtCompiler::new(&mut emitter, &mut symbols);
                for stmt in stmts {
                    compiler.compile(stmt)?;
                }
                debug!(variables = symbols.len(), "statements compiled");
                for (name, slot) in symbols.iter() {
                    trace!(name, %slot, "variable");
                }
            }
        }

        emitter.finalize()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use crate::test_support::compile_source;

    #[test]
    fn expression_program_prints_once() {
        let module = compile_source("11 * 22").unwrap();
        module.code().assert_opcodes(&[
            OpCode::Ldc,
            OpCode::Ldc,
            OpCode::Imul,
            OpCode::Getstatic,
            OpCode::Swap,
            OpCode::Invokevirtual,
            OpCode::Return,
        ]);
        assert_eq!(module.max_stack(), 2);
        assert_eq!(module.max_locals(), 1);
    }

    #[test]
    fn statement_program_has_no_implicit_print() {
        let module = compile_source("x = 11 * 22;").unwrap();
        assert!(!module.code().opcodes().contains(&OpCode::Invokevirtual));
    }

    #[test]
    fn empty_program_is_unknown() {
        let err = compile_source("").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnknownConstruct { ref construct, .. } if construct == "empty program"
        ));
    }

    #[test]
    fn text_expression_program() {
        let module = compile_source("\"hi\"").unwrap();
        module.code().assert_contains_opcodes(&[OpCode::Ldc, OpCode::Invokevirtual]);
    }

    #[test]
    fn recompiling_is_deterministic() {
        let source = "x = 300; for (i = 0; i < x) { print \"tick\"; print i; } print x * 2;";
        let first = compile_source(source).unwrap();
        let second = compile_source(source).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn class_name_is_used() {
        let arena = bumpalo::Bump::new();
        let program = arlang_parser::Parser::parse("print 1;", &arena).unwrap();
        let module = Compiler::compile_program(&program, "Greeter").unwrap();
        assert_eq!(module.class_name(), "Greeter");
        assert_eq!(module.file_name(), "Greeter.class");
    }
}
