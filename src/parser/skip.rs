//! Balanced-region skipping.
//!
//! These routines consume constructs the parser does not model while
//! keeping the cursor on a well-defined boundary. Neither ever consumes the
//! end-of-input token.

use crate::tokenizer::{TokenKind, EXPRESSION_KEYWORDS};

use super::Parser;

impl Parser {
    /// Consumes tokens until the bracket opened at `open` is closed.
    ///
    /// Only the bracket kind of `open` is counted. Returns the index of the
    /// closing token, or of the last token before end of input.
    pub(super) fn consume_balanced(&mut self, open: usize) -> usize {
        let open_kind = self.tokens[open].kind;
        let Some(close_kind) = open_kind.closing() else {
            return open;
        };

        let mut depth = 1usize;
        let mut last = open;
        while self.peek().is_some_and(|t| !t.is_eof()) {
            let Some(index) = self.next() else {
                break;
            };
            last = index;
            let kind = self.tokens[index].kind;
            if kind == open_kind {
                depth += 1;
            } else if kind == close_kind {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        last
    }

    /// Consumes the rest of an expression whose first token, at `first`,
    /// has already been consumed.
    ///
    /// All three bracket kinds are tracked together; a bracket opened by
    /// `first` seeds its counter. Scanning stops, without consuming, at the
    /// first boundary (see [`Parser::at_boundary`]) met outside brackets.
    /// Returns the index of the last consumed token.
    pub(super) fn skip_expression_after_first(&mut self, first: usize) -> usize {
        let mut braces = 0usize;
        let mut parens = 0usize;
        let mut brackets = 0usize;
        track_depth(self.tokens[first].kind, &mut braces, &mut parens, &mut brackets);

        let mut last = first;
        loop {
            let nested = braces + parens + brackets > 0;
            if nested {
                if self.peek().map_or(true, |t| t.is_eof()) {
                    break;
                }
            } else if self.at_boundary(last) {
                break;
            }

            let Some(index) = self.next() else {
                break;
            };
            last = index;
            track_depth(self.tokens[index].kind, &mut braces, &mut parens, &mut brackets);
        }
        last
    }

    /// Returns true if the current token ends the expression whose last
    /// token is at `last`.
    ///
    /// Boundaries are end of input, `,`, `;`, any closing bracket (at depth
    /// zero it belongs to an enclosing construct), statement keywords, and
    /// a new line starting with a word or literal right after a token that
    /// can end an expression.
    pub(super) fn at_boundary(&self, last: usize) -> bool {
        let Some(token) = self.peek() else {
            return true;
        };
        match token.kind {
            TokenKind::Eof | TokenKind::Comma => return true,
            kind if kind.is_close() => return true,
            TokenKind::Operator if token.value == ";" => return true,
            TokenKind::Keyword
                if !EXPRESSION_KEYWORDS.contains(&token.value.as_str())
                    && !self.at_dynamic_import() =>
            {
                return true
            }
            _ => {}
        }

        let previous = &self.tokens[last];
        let starts_line = token.line() > previous.span.end.line;
        let starts_statement = matches!(
            token.kind,
            TokenKind::Identifier | TokenKind::String | TokenKind::Number | TokenKind::Keyword
        );
        starts_line
            && starts_statement
            && previous.ends_expression()
            && previous.kind != TokenKind::AmbiguousGt
    }

    /// Returns true if the cursor is on `import(` or `import.meta`.
    fn at_dynamic_import(&self) -> bool {
        self.peek().is_some_and(|t| t.is_keyword("import"))
            && self
                .peek_next()
                .is_some_and(|t| t.kind == TokenKind::LeftParen || t.is_operator("."))
    }
}

fn track_depth(kind: TokenKind, braces: &mut usize, parens: &mut usize, brackets: &mut usize) {
    match kind {
        TokenKind::LeftBrace => *braces += 1,
        TokenKind::RightBrace => *braces = braces.saturating_sub(1),
        TokenKind::LeftParen => *parens += 1,
        TokenKind::RightParen => *parens = parens.saturating_sub(1),
        TokenKind::LeftBracket => *brackets += 1,
        TokenKind::RightBracket => *brackets = brackets.saturating_sub(1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Consumes the first token and skips the rest of the expression.
    fn skip(source: &str) -> (Parser, usize) {
        let mut parser = Parser::from_source(source);
        let first = parser.next().unwrap();
        let last = parser.skip_expression_after_first(first);
        (parser, last)
    }

    #[test]
    fn test_consume_balanced_nested() {
        let mut parser = Parser::from_source("{ a { b } c } d");
        let open = parser.next().unwrap();
        let last = parser.consume_balanced(open);
        assert_eq!(parser.tokens[last].value, "}");
        assert_eq!(parser.peek().unwrap().value, "d");
    }

    #[test]
    fn test_consume_balanced_stops_before_eof() {
        let mut parser = Parser::from_source("( a ( b");
        let open = parser.next().unwrap();
        let last = parser.consume_balanced(open);
        assert_eq!(parser.tokens[last].value, "b");
        assert!(parser.peek().unwrap().is_eof());
    }

    #[test]
    fn test_skip_stops_at_comma() {
        let (parser, last) = skip("a + f(b, c), d");
        assert_eq!(parser.tokens[last].value, ")");
        assert_eq!(parser.peek().unwrap().kind, TokenKind::Comma);
    }

    #[test]
    fn test_skip_seeded_by_first_bracket() {
        let (parser, last) = skip("{ a, b }.c; d");
        assert_eq!(parser.tokens[last].value, "c");
        assert!(parser.peek().unwrap().is_operator(";"));
    }

    #[test]
    fn test_skip_stops_at_unmatched_closer() {
        let (parser, last) = skip("a ? b : c ] rest");
        assert_eq!(parser.tokens[last].value, "c");
        assert_eq!(parser.peek().unwrap().kind, TokenKind::RightBracket);
    }

    #[test]
    fn test_skip_stops_at_statement_keyword() {
        let (parser, last) = skip("new Foo() instanceof Bar const x");
        assert_eq!(parser.tokens[last].value, "Bar");
        assert!(parser.peek().unwrap().is_keyword("const"));
    }

    #[test]
    fn test_skip_stops_at_new_line_statement() {
        let (parser, last) = skip("a + b\nfoo()");
        assert_eq!(parser.tokens[last].value, "b");
        assert_eq!(parser.peek().unwrap().value, "foo");
    }

    #[test]
    fn test_skip_continues_across_lines_inside_brackets() {
        let (parser, last) = skip("f(\n  a,\n  b\n)\nnext");
        assert_eq!(parser.tokens[last].value, ")");
        assert_eq!(parser.peek().unwrap().value, "next");
    }

    #[test]
    fn test_dynamic_import_is_not_a_boundary() {
        let (parser, last) = skip("await import('./a')\nimport b from 'b'");
        assert_eq!(parser.tokens[last].value, ")");
        assert!(parser.peek().unwrap().is_keyword("import"));
    }

    #[test]
    fn test_skip_continues_after_trailing_operator() {
        let (parser, last) = skip("a +\n  b;");
        assert_eq!(parser.tokens[last].value, "b");
    }
}
