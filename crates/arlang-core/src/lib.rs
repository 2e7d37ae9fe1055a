//! Core types shared by the ArLang parser and compiler.
//!
//! This crate holds the pieces every stage needs:
//! - [`Span`] for source locations
//! - [`Literal`] and [`ValueKind`], the value model handed to the emitter
//! - The error hierarchy ([`LexError`], [`ParseError`], [`CompileError`], [`ArlangError`])

mod error;
mod literal;
mod span;

pub use error::{ArlangError, CompileError, LexError, ParseError, ParseErrorKind};
pub use literal::{Literal, ValueKind};
pub use span::Span;
