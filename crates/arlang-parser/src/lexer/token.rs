//! Token types for the ArLang lexer.

use arlang_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme is copied into the parse arena, so tokens outlive the source
/// string they were scanned from.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    /// The source text of this token (allocated in arena).
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types in ArLang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Decimal integer literal: `42`
    IntLiteral,
    /// String literal, quotes included: `"hello"`
    StringLiteral,

    // =========================================
    // Identifiers and keywords
    // =========================================
    Identifier,
    /// `for`
    For,
    /// `print`
    Print,

    // =========================================
    // Operators
    // =========================================
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    // =========================================
    // Punctuation
    // =========================================
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,

    // =========================================
    // Special
    // =========================================
    /// End of input.
    Eof,
    /// A lexer error; details are recorded by the lexer.
    Error,
}

impl TokenKind {
    /// Human-readable description used in diagnostics.
    pub fn description(&self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            For => "'for'",
            Print => "'print'",
            Equal => "'='",
            EqualEqual => "'=='",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Semicolon => "';'",
            Eof => "end of input",
            Error => "invalid token",
        }
    }

    /// Whether this token can begin a statement on its own.
    pub fn is_statement_keyword(&self) -> bool {
        matches!(self, TokenKind::For | TokenKind::Print)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Map a keyword to its [`TokenKind`], or `None` for plain identifiers.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "for" => Some(TokenKind::For),
        "print" => Some(TokenKind::Print),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(lookup_keyword("for"), Some(TokenKind::For));
        assert_eq!(lookup_keyword("print"), Some(TokenKind::Print));
        assert_eq!(lookup_keyword("println"), None);
        assert_eq!(lookup_keyword("For"), None);
    }

    #[test]
    fn descriptions() {
        assert_eq!(TokenKind::Semicolon.to_string(), "';'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
        assert!(TokenKind::Print.is_statement_keyword());
        assert!(!TokenKind::Identifier.is_statement_keyword());
    }
}
