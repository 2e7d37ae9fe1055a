//! Lexical analysis for ArLang.

mod cursor;
mod lexer;
mod token;

pub use lexer::{Lexer, decode_text};
pub use token::{Token, TokenKind, lookup_keyword};
