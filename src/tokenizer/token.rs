//! Token types produced by the [`Lexer`](super::Lexer).

use serde::Serialize;
use std::fmt;

use crate::ast::{Position, Span};

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// End of input. Always the last token of a stream.
    Eof,
    Keyword,
    Identifier,
    /// String or template literal, quotes included.
    String,
    Number,
    Operator,
    /// A lone `>`: greater-than, JSX tag close, or the tail of `=>`.
    AmbiguousGt,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Comment,
    /// Regular expression literal, flags included.
    Regex,
}

impl TokenKind {
    /// Returns true for `{`, `(` and `[`.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftBracket
        )
    }

    /// Returns true for `}`, `)` and `]`.
    pub fn is_close(&self) -> bool {
        matches!(
            self,
            TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket
        )
    }

    /// The closing bracket that matches an opening one.
    pub fn closing(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LeftBrace => Some(TokenKind::RightBrace),
            TokenKind::LeftParen => Some(TokenKind::RightParen),
            TokenKind::LeftBracket => Some(TokenKind::RightBracket),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::AmbiguousGt => "OPERATOR_OR_AMBIGUOUS_GT",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Comment => "COMMENT",
            TokenKind::Regex => "REGEX",
        };
        f.write_str(name)
    }
}

/// Reserved words that lex as [`TokenKind::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "import",
    "export",
    "default",
    "const",
    "let",
    "var",
    "function",
    "class",
    "return",
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "case",
    "break",
    "continue",
    "new",
    "this",
    "typeof",
    "instanceof",
    "in",
    "void",
    "delete",
    "throw",
    "try",
    "catch",
    "finally",
    "yield",
    "await",
    "extends",
    "super",
    "static",
    "null",
    "true",
    "false",
    "with",
    "debugger",
    "enum",
];

/// Keywords that begin a variable declaration.
pub const VARIABLE_KEYWORDS: &[&str] = &["const", "let", "var"];

/// Keywords that may appear inside an expression.
pub const EXPRESSION_KEYWORDS: &[&str] = &[
    "new",
    "typeof",
    "instanceof",
    "in",
    "void",
    "delete",
    "await",
    "yield",
    "this",
    "super",
    "null",
    "true",
    "false",
    "function",
    "class",
    "extends",
];

/// Returns true if `word` is a reserved word.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// A lexical unit with its source text and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source slice.
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    /// The end-of-input sentinel, an empty token at `end`.
    pub fn eof(end: Position) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(end, end))
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }

    pub fn column(&self) -> usize {
        self.span.start.column
    }

    pub fn start_offset(&self) -> usize {
        self.span.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.span.end.offset
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Returns true if this is the keyword `word`.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == word
    }

    /// Returns true if this is an identifier spelled `word`.
    pub fn is_identifier(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.value == word
    }

    /// Returns true if this is the operator `op`.
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == op
    }

    /// Returns true if this token may be the last token of an expression.
    ///
    /// Used by the lexer to tell regex literals from division, and by the
    /// parser to find statement ends that rely on automatic semicolon
    /// insertion.
    pub fn ends_expression(&self) -> bool {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::String
            | TokenKind::Number
            | TokenKind::Regex
            | TokenKind::RightBrace
            | TokenKind::RightParen
            | TokenKind::RightBracket => true,
            TokenKind::Keyword => matches!(
                self.value.as_str(),
                "this" | "super" | "null" | "true" | "false"
            ),
            TokenKind::Operator => matches!(self.value.as_str(), "++" | "--"),
            TokenKind::AmbiguousGt => true,
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at {}", self.kind, self.value, self.span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, value: &str) -> Token {
        Token::new(kind, value, Span::default())
    }

    #[test]
    fn test_keyword_sets() {
        assert!(is_keyword("import"));
        assert!(is_keyword("let"));
        assert!(!is_keyword("from"));
        assert!(!is_keyword("async"));
        for word in VARIABLE_KEYWORDS.iter().chain(EXPRESSION_KEYWORDS) {
            assert!(is_keyword(word), "{} should be a keyword", word);
        }
    }

    #[test]
    fn test_bracket_pairs() {
        assert_eq!(TokenKind::LeftParen.closing(), Some(TokenKind::RightParen));
        assert_eq!(TokenKind::Comma.closing(), None);
        assert!(TokenKind::LeftBracket.is_open());
        assert!(TokenKind::RightBrace.is_close());
    }

    #[test]
    fn test_ends_expression() {
        assert!(token(TokenKind::Identifier, "a").ends_expression());
        assert!(token(TokenKind::RightParen, ")").ends_expression());
        assert!(token(TokenKind::Keyword, "this").ends_expression());
        assert!(!token(TokenKind::Keyword, "return").ends_expression());
        assert!(!token(TokenKind::Operator, "=").ends_expression());
        assert!(!token(TokenKind::Comma, ",").ends_expression());
    }

    #[test]
    fn test_token_display() {
        let t = token(TokenKind::AmbiguousGt, ">");
        assert_eq!(t.to_string(), "OPERATOR_OR_AMBIGUOUS_GT(\">\") at 1:0");
    }
}
