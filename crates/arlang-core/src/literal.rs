//! The value model handed from the code generator to the emitter.

use std::fmt;

use crate::{CompileError, Span};

/// A literal value ready for emission.
///
/// The parser keeps integers at 64-bit width so that out-of-range input can be
/// reported with its span; [`Literal::integer`] performs the narrowing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// A 32-bit signed integer.
    Integer(i32),
    /// Decoded text, without its quote delimiters.
    Text(String),
}

impl Literal {
    /// Narrow a parsed integer to the runtime's integer width.
    pub fn integer(value: i64, span: Span) -> Result<Self, CompileError> {
        i32::try_from(value)
            .map(Literal::Integer)
            .map_err(|_| CompileError::NumericRange { value, span })
    }

    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text(value.into())
    }

    /// The kind of value this literal leaves on the operand stack.
    pub fn kind(&self) -> ValueKind {
        match self {
            Literal::Integer(_) => ValueKind::Int,
            Literal::Text(_) => ValueKind::Text,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::Text(text) => write!(f, "{text:?}"),
        }
    }
}

/// What sits on top of the operand stack when a value is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Int => f.write_str("int"),
            ValueKind::Text => f.write_str("text"),
        }
    }
}
