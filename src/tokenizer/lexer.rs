//! Source text to token stream.
//!
//! The lexer is total: every input, however malformed, produces a token
//! stream ending in [`TokenKind::Eof`]. Characters it does not recognize
//! become one-character [`TokenKind::Operator`] tokens and unterminated
//! literals stop at the end of their line.

use crate::ast::{Position, Span};

use super::token::{is_keyword, Token, TokenKind};

/// Punctuators, longest first. None of them starts with `>` so that `>` is
/// always its own [`TokenKind::AmbiguousGt`] token, and `=` only combines
/// into equality operators so that `=>` is always `=` followed by `>`.
const PUNCTUATORS: &[&str] = &[
    "...", "===", "!==", "**=", "<<=", "&&=", "||=", "??=", "==", "!=", "<=", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "&&", "||", "??", "?.", "++", "--", "**", "<<", "=", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", ";", ".", "<", "@", "#",
];

/// Converts JavaScript/JSX source text into tokens.
///
/// # Example
///
/// ```
/// use jsxscope::tokenizer::{Lexer, TokenKind};
///
/// let tokens = Lexer::tokenize("const f = x => x;");
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds[4], TokenKind::Operator);
/// assert_eq!(kinds[5], TokenKind::AmbiguousGt);
/// assert_eq!(kinds.last(), Some(&TokenKind::Eof));
/// ```
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenizes `source` in one call.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).run()
    }

    /// Consumes the lexer and returns every token, comments included.
    pub fn run(mut self) -> Vec<Token> {
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                break;
            };
            let start = self.position();
            let kind = self.scan(c);
            self.push(kind, start);
        }
        let end = self.position();
        self.tokens.push(Token::eof(end));
        self.tokens
    }

    // ===== Cursor =====

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, start: Position) {
        let end = self.position();
        let value = &self.source[start.offset..end.offset];
        let kind = match kind {
            TokenKind::Identifier if is_keyword(value) => TokenKind::Keyword,
            other => other,
        };
        self.tokens
            .push(Token::new(kind, value, Span::new(start, end)));
    }

    fn skip_whitespace(&mut self) {
        self.bump_while(|c| c.is_whitespace() || c == '\u{feff}');
    }

    /// The last token that is not a comment.
    fn previous_significant(&self) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| t.kind != TokenKind::Comment)
    }

    // ===== Scanners =====

    fn scan(&mut self, c: char) -> TokenKind {
        match c {
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            ',' => self.single(TokenKind::Comma),
            '>' => self.single(TokenKind::AmbiguousGt),
            '\'' | '"' => self.scan_string(c),
            '`' => self.scan_template(),
            '/' => self.scan_slash(),
            '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => {
                self.bump_while(is_identifier_part);
                TokenKind::Identifier
            }
            _ => self.scan_punctuator(),
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn scan_punctuator(&mut self) -> TokenKind {
        let rest = self.rest();
        let matched = PUNCTUATORS.iter().find(|p| rest.starts_with(**p));
        match matched {
            // `a?.5:b` is a conditional, not optional chaining.
            Some(&"?.") if self.peek_at(2).is_some_and(|c| c.is_ascii_digit()) => {
                self.bump();
            }
            Some(p) => self.bump_n(p.chars().count()),
            None => {
                self.bump();
            }
        }
        TokenKind::Operator
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    if self.peek() != Some('\n') {
                        self.bump();
                    }
                }
                '\n' => break,
                c if c == quote => {
                    self.bump();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
        TokenKind::String
    }

    fn scan_template(&mut self) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '`' => {
                    self.bump();
                    break;
                }
                '$' if self.peek_at(1) == Some('{') => {
                    self.bump_n(2);
                    self.skip_substitution();
                }
                _ => {
                    self.bump();
                }
            }
        }
        TokenKind::String
    }

    /// Skips a `${…}` body up to and including its closing brace.
    fn skip_substitution(&mut self) {
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    depth += 1;
                    self.bump();
                }
                '}' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                '\'' | '"' => {
                    self.scan_string(c);
                }
                '`' => {
                    self.scan_template();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        match self.peek_at(1) {
            Some('/') => self.scan_line_comment(),
            Some('*') => self.scan_block_comment(),
            _ if self.regex_allowed() && self.scan_regex() => TokenKind::Regex,
            _ => self.scan_punctuator(),
        }
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        self.bump_while(|c| c != '\n');
        TokenKind::Comment
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.bump_n(2);
        while self.peek().is_some() {
            if self.rest().starts_with("*/") {
                self.bump_n(2);
                break;
            }
            self.bump();
        }
        TokenKind::Comment
    }

    fn scan_number(&mut self) -> TokenKind {
        let radix_prefix = self.peek() == Some('0')
            && matches!(
                self.peek_at(1),
                Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')
            );
        if radix_prefix {
            self.bump_n(2);
            self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return TokenKind::Number;
        }

        self.bump_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.bump_n(digit_at);
                self.bump_while(|c| c.is_ascii_digit() || c == '_');
            }
        }
        if self.peek() == Some('n') {
            self.bump();
        }
        TokenKind::Number
    }

    /// Whether a `/` at the current position may open a regex literal.
    fn regex_allowed(&self) -> bool {
        let Some(prev) = self.previous_significant() else {
            return true;
        };
        match prev.kind {
            TokenKind::Operator => !matches!(prev.value.as_str(), "<" | "++" | "--"),
            TokenKind::LeftBrace
            | TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::Comma => true,
            TokenKind::Keyword => !prev.ends_expression(),
            // `=>` directly before the slash starts an arrow body.
            TokenKind::AmbiguousGt => self
                .tokens
                .iter()
                .rev()
                .nth(1)
                .is_some_and(|t| t.is_operator("=") && t.end_offset() == prev.start_offset()),
            _ => false,
        }
    }

    /// Scans a regex literal if one closes on the current line. Leaves the
    /// cursor untouched and returns false otherwise.
    fn scan_regex(&mut self) -> bool {
        let Some(len) = regex_length(self.rest()) else {
            return false;
        };
        let chars = self.rest()[..len].chars().count();
        self.bump_n(chars);
        self.bump_while(is_identifier_part);
        true
    }
}

/// Byte length of the `/…/` body at the start of `text`, or `None` when
/// the line ends first.
fn regex_length(text: &str) -> Option<usize> {
    let mut in_class = false;
    let mut escaped = false;
    for (i, c) in text.char_indices().skip(1) {
        if c == '\n' || c == '\r' {
            return None;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).iter().map(|t| t.kind).collect()
    }

    fn values(source: &str) -> Vec<String> {
        Lexer::tokenize(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.value)
            .collect()
    }

    // ===== Basic Tokens =====

    #[test]
    fn test_import_statement() {
        let tokens = Lexer::tokenize("import { useState } from 'react';");
        let expected = [
            (TokenKind::Keyword, "import"),
            (TokenKind::LeftBrace, "{"),
            (TokenKind::Identifier, "useState"),
            (TokenKind::RightBrace, "}"),
            (TokenKind::Identifier, "from"),
            (TokenKind::String, "'react'"),
            (TokenKind::Operator, ";"),
            (TokenKind::Eof, ""),
        ];
        assert_eq!(tokens.len(), expected.len());
        for (token, (kind, value)) in tokens.iter().zip(expected) {
            assert_eq!(token.kind, kind);
            assert_eq!(token.value, value);
        }
    }

    #[test]
    fn test_empty_source() {
        let tokens = Lexer::tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert_eq!(tokens[0].start_offset(), 0);
        assert_eq!(tokens[0].end_offset(), 0);
    }

    #[test]
    fn test_eof_at_source_length() {
        let source = "const a = 'é';\n";
        let tokens = Lexer::tokenize(source);
        let eof = tokens.last().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.start_offset(), source.len());
        assert_eq!(eof.end_offset(), source.len());
        assert_eq!(eof.line(), 2);
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::tokenize("const a = 1;\n  let b");
        let b = &tokens[5];
        assert_eq!(b.value, "let");
        assert_eq!(b.line(), 2);
        assert_eq!(b.column(), 2);
        assert_eq!(b.start_offset(), 15);
        assert_eq!(b.end_offset(), 18);
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens = Lexer::tokenize("'日本' x");
        assert_eq!(tokens[1].value, "x");
        assert_eq!(tokens[1].column(), 5);
        assert_eq!(tokens[1].start_offset(), 9);
    }

    // ===== Operators =====

    #[test]
    fn test_arrow_is_split() {
        assert_eq!(
            kinds("=>"),
            vec![TokenKind::Operator, TokenKind::AmbiguousGt, TokenKind::Eof]
        );
        assert_eq!(values("a === b"), vec!["a", "===", "b"]);
        assert_eq!(values("a >= b"), vec!["a", ">", "=", "b"]);
        assert_eq!(values("a >>> b"), vec!["a", ">", ">", ">", "b"]);
        assert_eq!(values("...rest"), vec!["...", "rest"]);
    }

    #[test]
    fn test_optional_chaining_vs_conditional() {
        assert_eq!(values("a?.b"), vec!["a", "?.", "b"]);
        assert_eq!(values("a?.5:1"), vec!["a", "?", ".5", ":", "1"]);
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        let tokens = Lexer::tokenize("async from as of let");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[4].kind, TokenKind::Keyword);
    }

    // ===== Literals =====

    #[test]
    fn test_strings_keep_quotes() {
        assert_eq!(values(r#"'a' "b\"c""#), vec!["'a'", r#""b\"c""#]);
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let tokens = Lexer::tokenize("'abc\nfoo");
        assert_eq!(tokens[0].value, "'abc");
        assert_eq!(tokens[1].value, "foo");
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_template_literal_is_single_token() {
        let source = "`a ${ {x: `b${c}`}.x } d`";
        let tokens = Lexer::tokenize(source);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, source);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            values("1 1.5 .5 1e10 2E-3 0xFF 1_000 10n"),
            vec!["1", "1.5", ".5", "1e10", "2E-3", "0xFF", "1_000", "10n"]
        );
        assert!(kinds("0xFF").starts_with(&[TokenKind::Number]));
    }

    // ===== Comments and Regex =====

    #[test]
    fn test_comments() {
        let tokens = Lexer::tokenize("// line\na /* block\n */ b");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].value, "// line");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[3].value, "b");
        assert_eq!(tokens[3].line(), 3);
    }

    #[test]
    fn test_regex_vs_division() {
        let tokens = Lexer::tokenize("const r = /a[/]b(/g; x = a / b / c;");
        assert_eq!(tokens[3].kind, TokenKind::Regex);
        assert_eq!(tokens[3].value, "/a[/]b(/g");
        let slashes = tokens.iter().filter(|t| t.is_operator("/")).count();
        assert_eq!(slashes, 2);
    }

    #[test]
    fn test_regex_after_arrow() {
        let tokens = Lexer::tokenize("f = s => /x/.test(s)");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Regex && t.value == "/x/"));
    }

    #[test]
    fn test_jsx_closing_tag_is_not_regex() {
        let tokens = Lexer::tokenize("<div>text</div>");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Regex));
        assert_eq!(
            values("<div>text</div>"),
            vec!["<", "div", ">", "text", "<", "/", "div", ">"]
        );
    }

    #[test]
    fn test_slash_without_close_is_operator() {
        let tokens = Lexer::tokenize("(/ x\n)");
        assert!(tokens[1].is_operator("/"));
    }

    #[test]
    fn test_unknown_character_is_operator() {
        let tokens = Lexer::tokenize("a \\ b");
        assert!(tokens[1].is_operator("\\"));
        assert_eq!(tokens.len(), 4);
    }
}
