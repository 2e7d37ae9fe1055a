//! ArLang parser crate.
//!
//! This crate turns ArLang source text into an arena-allocated AST:
//! - Lexical analysis (tokenization)
//! - Abstract Syntax Tree (AST) definitions
//! - A precedence-climbing parser that stops at the first error
//!
//! # Example
//!
//! ```
//! use arlang_parser::{Parser, ast::ProgramBody};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let program = Parser::parse("x = 5; print x;", &arena).unwrap();
//! match program.body {
//!     ProgramBody::Statements(stmts) => assert_eq!(stmts.len(), 2),
//!     ProgramBody::Expression(_) => unreachable!(),
//! }
//! ```

pub mod ast;
pub mod lexer;

pub use ast::Parser;
pub use lexer::{Lexer, Token, TokenKind};
