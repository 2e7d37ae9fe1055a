//! Error types for every phase of ArLang compilation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ArlangError (top-level wrapper)
//! ├── ParseError    - syntax errors, including lexer failures (with ParseErrorKind)
//! └── CompileError  - code generation and emitter errors
//! ```
//!
//! [`LexError`] is produced by the lexer and converted into a
//! [`ParseError`] before it leaves the parser crate. Compilation stops at
//! the first error of any kind.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    #[error("invalid escape sequence '\\{ch}' at {span}")]
    InvalidEscape { ch: char, span: Span },

    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::InvalidEscape { span, .. } => *span,
            LexError::UnterminatedComment { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Input ended in the middle of a construct.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// A statement was expected.
    ExpectedStatement,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// The statement is malformed (e.g. a loop condition not testing its counter).
    InvalidStatement,
    /// A literal could not be represented.
    InvalidLiteral,
    /// Invalid escape sequence in a string literal.
    InvalidEscapeSequence,
    /// Parentheses or loop bodies nested past the parser's limit.
    NestingTooDeep,
    /// Any other lexical or grammatical failure.
    InvalidSyntax,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedStatement => "expected statement",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::InvalidStatement => "invalid statement",
            ParseErrorKind::InvalidLiteral => "invalid literal",
            ParseErrorKind::InvalidEscapeSequence => "invalid escape sequence",
            ParseErrorKind::NestingTooDeep => "nesting too deep",
            ParseErrorKind::InvalidSyntax => "invalid syntax",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntax error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            "unexpected end of file",
        )
    }

    /// Format the error with the offending source line and a caret.
    pub fn display_with_source(&self, source: &str) -> String {
        render_excerpt(source, self.span, self.kind.as_str(), &self.message)
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        let kind = match error {
            LexError::InvalidEscape { .. } => ParseErrorKind::InvalidEscapeSequence,
            _ => ParseErrorKind::InvalidSyntax,
        };
        ParseError::new(kind, error.span(), format!("lexer error: {error}"))
    }
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors raised by the code generator and the instruction emitter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The program is neither a single expression nor a statement sequence.
    #[error("at {span}: unknown construct: {construct}")]
    UnknownConstruct { construct: String, span: Span },

    /// A for-loop condition uses something other than `<`, `<=`, `>`, `>=`.
    #[error("at {span}: invalid operator '{op}' for for-loop condition")]
    InvalidLoopCondition { op: String, span: Span },

    /// A for-loop body holds a statement other than `print`.
    #[error("at {span}: only print statements are allowed in a loop body, found {statement}")]
    UnsupportedLoopBody { statement: String, span: Span },

    /// A variable is read before anything was assigned to it.
    #[error("at {span}: unknown identifier '{name}'")]
    UnknownIdentifier { name: String, span: Span },

    /// A comparison operator appears where an arithmetic result is needed.
    #[error("at {span}: operator '{op}' cannot be used in an arithmetic expression")]
    UnsupportedOperator { op: String, span: Span },

    /// A text value is used where an integer is required.
    #[error("at {span}: text values can only be printed")]
    TextOperand { span: Span },

    /// Emitter lifecycle methods were called out of order.
    #[error("emitter state: cannot {operation}: {reason}")]
    EmitterState {
        operation: &'static str,
        reason: &'static str,
    },

    /// An integer literal does not fit the runtime's 32-bit integers.
    #[error("at {span}: integer literal {value} is outside the 32-bit range")]
    NumericRange { value: i64, span: Span },

    /// A branch target is further away than a 16-bit offset can reach.
    #[error("branch distance {distance} does not fit in a 16-bit offset")]
    BranchOutOfRange { distance: i64 },

    /// More constants than a class file can index.
    #[error("constant pool exceeds {limit} entries")]
    ConstantPoolOverflow { limit: usize },

    /// More local variables than a method frame can address.
    #[error("method needs more than {limit} local slots")]
    TooManyLocals { limit: usize },

    /// A text constant whose encoded form exceeds what a `Utf8` entry can hold.
    #[error("text constant of {length} bytes exceeds the 65535 byte limit")]
    TextTooLong { length: usize },

    /// The code array of `main` is longer than a method may be.
    #[error("method code of {length} bytes exceeds the 65535 byte limit")]
    CodeTooLarge { length: usize },
}

impl CompileError {
    /// The source location, for errors that have one.
    ///
    /// Errors raised by the emitter itself carry an unknown span and report
    /// `None` here.
    pub fn span(&self) -> Option<Span> {
        let span = match self {
            CompileError::UnknownConstruct { span, .. }
            | CompileError::InvalidLoopCondition { span, .. }
            | CompileError::UnsupportedLoopBody { span, .. }
            | CompileError::UnknownIdentifier { span, .. }
            | CompileError::UnsupportedOperator { span, .. }
            | CompileError::TextOperand { span }
            | CompileError::NumericRange { span, .. } => *span,
            CompileError::EmitterState { .. }
            | CompileError::BranchOutOfRange { .. }
            | CompileError::ConstantPoolOverflow { .. }
            | CompileError::TooManyLocals { .. }
            | CompileError::TextTooLong { .. }
            | CompileError::CodeTooLarge { .. } => return None,
        };
        span.is_known().then_some(span)
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            CompileError::UnknownConstruct { .. } => "unknown construct",
            CompileError::InvalidLoopCondition { .. } => "invalid loop condition",
            CompileError::UnsupportedLoopBody { .. } => "unsupported loop body",
            CompileError::UnknownIdentifier { .. } => "unknown identifier",
            CompileError::UnsupportedOperator { .. } => "unsupported operator",
            CompileError::TextOperand { .. } => "text operand",
            CompileError::EmitterState { .. } => "emitter state",
            CompileError::NumericRange { .. } => "numeric range",
            CompileError::BranchOutOfRange { .. } => "branch out of range",
            CompileError::ConstantPoolOverflow { .. } => "constant pool overflow",
            CompileError::TooManyLocals { .. } => "too many locals",
            CompileError::TextTooLong { .. } => "text too long",
            CompileError::CodeTooLarge { .. } => "code too large",
        }
    }
}

// ============================================================================
// Unified Error
// ============================================================================

/// The error returned by the end-to-end `compile` entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArlangError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl ArlangError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, ArlangError::Syntax(_))
    }

    pub fn is_compile(&self) -> bool {
        matches!(self, ArlangError::Compile(_))
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ArlangError::Syntax(err) => Some(err.span),
            ArlangError::Compile(err) => err.span(),
        }
    }

    /// Format the error, with a source excerpt when the location is known.
    pub fn display_with_source(&self, source: &str) -> String {
        match self {
            ArlangError::Syntax(err) => err.display_with_source(source),
            ArlangError::Compile(err) => match err.span() {
                Some(span) => render_excerpt(source, span, err.kind_name(), &err.to_string()),
                None => format!("error: {err}\n"),
            },
        }
    }
}

fn render_excerpt(source: &str, span: Span, headline: &str, message: &str) -> String {
    let mut output = format!("Error at {}:{}: {}\n", span.line, span.col, headline);
    if !message.is_empty() {
        output.push_str(&format!("  {message}\n"));
    }

    let line_text = (span.line as usize)
        .checked_sub(1)
        .and_then(|index| source.lines().nth(index));
    if let Some(line_text) = line_text {
        output.push_str("  |\n");
        output.push_str(&format!("{:>3} | {}\n", span.line, line_text));
        let indent = " ".repeat(span.col.saturating_sub(1) as usize);
        let underline = "~".repeat(span.len.saturating_sub(1) as usize);
        output.push_str(&format!("  | {indent}^{underline}\n"));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::UnexpectedChar {
            ch: '@',
            span: Span::new(1, 5, 1),
        };
        assert_eq!(err.to_string(), "unexpected character '@' at 1:5");
    }

    #[test]
    fn lex_error_becomes_syntax_error() {
        let err: ParseError = LexError::InvalidEscape {
            ch: 'q',
            span: Span::new(1, 8, 2),
        }
        .into();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscapeSequence);
        assert_eq!(err.span, Span::new(1, 8, 2));
        assert!(err.message.contains("'\\q'"));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::expected_token(Span::new(1, 10, 1), "';'", "'}'");
        assert_eq!(
            err.to_string(),
            "expected token at 1:10: expected ';', found '}'"
        );
    }

    #[test]
    fn parse_error_with_source_has_caret() {
        let source = "x = 5\nprint x;";
        let err = ParseError::expected_token(Span::new(2, 1, 5), "';'", "'print'");
        let rendered = err.display_with_source(source);
        assert!(rendered.starts_with("Error at 2:1: expected token\n"));
        assert!(rendered.contains("  2 | print x;\n"));
        assert!(rendered.ends_with("  | ^~~~\n"));
    }

    #[test]
    fn compile_error_display() {
        let err = CompileError::UnknownIdentifier {
            name: "y".into(),
            span: Span::new(1, 7, 1),
        };
        assert_eq!(err.to_string(), "at 1:7: unknown identifier 'y'");

        let err = CompileError::EmitterState {
            operation: "finalize",
            reason: "no module has begun",
        };
        assert_eq!(
            err.to_string(),
            "emitter state: cannot finalize: no module has begun"
        );
        assert_eq!(err.span(), None);
    }

    #[test]
    fn unified_error_conversions() {
        let err: ArlangError = ParseError::unexpected_eof(Span::point(1, 4)).into();
        assert!(err.is_syntax());
        assert_eq!(err.span(), Some(Span::point(1, 4)));

        let err: ArlangError = CompileError::ConstantPoolOverflow { limit: 65535 }.into();
        assert!(err.is_compile());
        assert_eq!(err.span(), None);
        assert_eq!(
            err.display_with_source("1 + 2"),
            "error: constant pool exceeds 65535 entries\n"
        );
    }

    #[test]
    fn compile_error_with_source() {
        let err: ArlangError = CompileError::InvalidLoopCondition {
            op: "==".into(),
            span: Span::new(1, 14, 6),
        }
        .into();
        let rendered = err.display_with_source("for (i = 1; i == 4) { print i; }");
        assert!(rendered.starts_with("Error at 1:14: invalid loop condition\n"));
        assert!(rendered.contains("invalid operator '==' for for-loop condition"));
        assert!(rendered.ends_with(&format!("  | {}^~~~~\n", " ".repeat(13))));
    }

    #[test]
    fn unknown_span_is_not_reported() {
        let err = CompileError::UnsupportedOperator {
            op: "<".into(),
            span: Span::default(),
        };
        assert_eq!(err.span(), None);
        let err: ArlangError = err.into();
        assert!(err.display_with_source("x = 1;").starts_with("error: "));
    }
}
