//! Tokenizer for JavaScript and JSX source.
//!
//! Produces the flat token stream the [`parser`](crate::parser) consumes.
//! The lexer does not try to understand JSX: `<`, `>` and text inside tags
//! come out as ordinary tokens, and `>` is always a separate
//! [`TokenKind::AmbiguousGt`] token that the parser interprets in context.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{
    is_keyword, Token, TokenKind, EXPRESSION_KEYWORDS, KEYWORDS, VARIABLE_KEYWORDS,
};
