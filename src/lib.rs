//! ArLang: a toy language compiled to JVM class files.
//!
//! A program is either a single arithmetic expression, whose value is printed:
//!
//! ```text
//! 11 * 22
//! ```
//!
//! or a sequence of assignments, prints and counting loops:
//!
//! ```text
//! x = 5;
//! print x;
//! for (i = 1; i < 4) { print i; }
//! print "done";
//! ```
//!
//! The pipeline is [`Parser::parse`] followed by
//! [`Compiler::compile_program`]; [`compile`] runs both.
//!
//! # Example
//!
//! ```
//! let module = arlang::compile("x = 5; print x;", "Program").unwrap();
//! assert_eq!(module.file_name(), "Program.class");
//! assert_eq!(&module.as_bytes()[..4], &[0xca, 0xfe, 0xba, 0xbe]);
//! ```

pub use arlang_compiler::{Compiler, Emitter, Module, SymbolTable};
pub use arlang_core::{
    ArlangError, CompileError, LexError, Literal, ParseError, ParseErrorKind, Span, ValueKind,
};
pub use arlang_parser::Parser;

pub mod ast {
    pub use arlang_parser::ast::*;
}

pub mod bytecode {
    pub use arlang_compiler::bytecode::*;
}

use bumpalo::Bump;
use tracing::debug;

/// Parse and compile `source` into class `class_name`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(source: &str, class_name: &str) -> Result<Module, ArlangError> {
    let arena = Bump::new();
    let program = Parser::parse(source, &arena)?;
    debug!(expression = program.is_expression(), "parsed program");
    Ok(Compiler::compile_program(&program, class_name)?)
}
