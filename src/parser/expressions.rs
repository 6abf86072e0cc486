//! Expression dispatch.
//!
//! Every expression position (initializers, `export default`, property
//! values, array elements, call arguments, arrow bodies) goes through
//! [`Parser::parse_expression`], which classifies on the first token.

use tracing::trace;

use crate::ast::{
    ArrayExpression, ArrowFunctionExpression, CallExpression, Expression, Identifier,
    ImportExpression, MemberExpression, NumericLiteral, ObjectExpression, ObjectProperty,
    PropertyKey, StringLiteral,
};
use crate::tokenizer::TokenKind;

use super::{Parsed, Parser};

impl Parser {
    /// Parses the expression starting at the already-consumed token `first`.
    ///
    /// If a modeled node is followed by anything other than a boundary
    /// (`a + 1`, `cond ? x : y`, `list[0]`), the node is dropped and the rest
    /// of the expression is skipped, so `last` always reaches the end.
    pub(super) fn parse_expression(&mut self, first: usize) -> Parsed {
        let parsed = self.parse_primary(first);
        if self.at_boundary(parsed.last) {
            return parsed;
        }
        trace!(
            line = self.tokens[first].line(),
            "skipped unmodeled expression continuation"
        );
        Parsed::skipped(self.skip_expression_after_first(parsed.last))
    }

    fn parse_primary(&mut self, first: usize) -> Parsed {
        let token = &self.tokens[first];
        match token.kind {
            TokenKind::String => Parsed::new(
                Expression::StringLiteral(StringLiteral {
                    span: token.span,
                    value: token.value.clone(),
                }),
                first,
            ),
            TokenKind::Number => Parsed::new(
                Expression::NumericLiteral(NumericLiteral {
                    span: token.span,
                    raw: token.value.clone(),
                }),
                first,
            ),
            TokenKind::Identifier => self.parse_identifier_expression(first),
            TokenKind::LeftBrace => self.parse_object(first),
            TokenKind::LeftBracket => self.parse_array(first),
            TokenKind::LeftParen => {
                if self.arrow_follows_parens(self.index) {
                    self.parse_arrow_with_parens(first, first, false)
                } else {
                    Parsed::skipped(self.consume_balanced(first))
                }
            }
            TokenKind::Keyword if token.value == "function" => self.skip_function_expression(first),
            TokenKind::Keyword if token.value == "import" && self.peek_is(TokenKind::LeftParen) => {
                let callee = Expression::ImportExpression(ImportExpression { span: token.span });
                self.parse_chain(callee, first, first)
            }
            _ => Parsed::skipped(self.skip_expression_after_first(first)),
        }
    }

    fn parse_identifier_expression(&mut self, first: usize) -> Parsed {
        if self.tokens[first].value == "async" {
            let single = self.peek_is(TokenKind::Identifier)
                && self.tokens.get(self.index + 1).is_some_and(|t| t.is_operator("="))
                && self
                    .tokens
                    .get(self.index + 2)
                    .is_some_and(|t| t.kind == TokenKind::AmbiguousGt);
            if single {
                if let Some(param) = self.next() {
                    return self.parse_arrow_with_single_param(first, param, true);
                }
            }
            if self.peek_is(TokenKind::LeftParen) && self.arrow_follows_parens(self.index + 1) {
                if let Some(open) = self.next() {
                    return self.parse_arrow_with_parens(first, open, true);
                }
            }
        }

        if self.is_arrow_with_single_param() {
            return self.parse_arrow_with_single_param(first, first, false);
        }

        let identifier = Expression::Identifier(self.identifier(first));
        self.parse_chain(identifier, first, first)
    }

    // ===== Calls and Member Access =====

    /// Extends `expr` with any `.name` and `(…)` suffixes.
    fn parse_chain(&mut self, expr: Expression, start: usize, last: usize) -> Parsed {
        let mut expr = expr;
        let mut last = last;

        loop {
            let member_access = self
                .peek()
                .is_some_and(|t| t.is_operator(".") || t.is_operator("?."))
                && self
                    .peek_next()
                    .is_some_and(|t| matches!(t.kind, TokenKind::Identifier | TokenKind::Keyword));

            if member_access {
                self.next();
                let Some(property_index) = self.next() else {
                    break;
                };
                expr = Expression::MemberExpression(MemberExpression {
                    span: self.span_between(start, property_index),
                    object: Box::new(expr),
                    property: self.identifier(property_index),
                    computed: false,
                });
                last = property_index;
            } else if self.peek_is(TokenKind::LeftParen) {
                let Some(open) = self.next() else {
                    break;
                };
                let (arguments, close) = self.parse_arguments(open);
                expr = Expression::CallExpression(CallExpression {
                    span: self.span_between(start, close),
                    callee: Box::new(expr),
                    arguments,
                });
                last = close;
            } else {
                break;
            }
        }

        Parsed::new(expr, last)
    }

    /// Parses call arguments after the consumed `(` at `open`. Returns the
    /// modeled arguments and the index of the closing parenthesis (or the
    /// last token before end of input).
    fn parse_arguments(&mut self, open: usize) -> (Vec<Expression>, usize) {
        let mut arguments = Vec::new();
        let mut last = open;

        while let Some(kind) = self.peek().map(|t| t.kind) {
            match kind {
                TokenKind::Eof => break,
                TokenKind::RightParen => {
                    if let Some(close) = self.next() {
                        last = close;
                    }
                    break;
                }
                TokenKind::Comma => {
                    if let Some(comma) = self.next() {
                        last = comma;
                    }
                }
                _ => {
                    let Some(first) = self.next() else {
                        break;
                    };
                    let parsed = self.parse_expression(first);
                    arguments.extend(parsed.node);
                    last = parsed.last;
                }
            }
        }

        (arguments, last)
    }

    // ===== Arrow Functions =====

    /// Returns true if the current token is `=` followed by `>`.
    fn is_arrow_with_single_param(&self) -> bool {
        self.peek().is_some_and(|t| t.is_operator("="))
            && self
                .peek_next()
                .is_some_and(|t| t.kind == TokenKind::AmbiguousGt)
    }

    /// Scans from `from`, the index just after an opening `(`, to its
    /// matching `)` and checks that `=` `>` follows.
    ///
    /// Reads tokens by index only; the cursor does not move.
    pub(super) fn arrow_follows_parens(&self, from: usize) -> bool {
        let mut depth = 1usize;
        for (offset, token) in self.tokens.iter().enumerate().skip(from) {
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        let equals = self.tokens.get(offset + 1);
                        let gt = self.tokens.get(offset + 2);
                        return equals.is_some_and(|t| t.is_operator("="))
                            && gt.is_some_and(|t| t.kind == TokenKind::AmbiguousGt);
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    /// `x => body`. `param` is the consumed parameter; the cursor is on `=`.
    fn parse_arrow_with_single_param(
        &mut self,
        start: usize,
        param: usize,
        is_async: bool,
    ) -> Parsed {
        let params = vec![self.identifier(param)];
        self.next();
        let arrow = self.next().unwrap_or(param);
        self.parse_arrow_body(start, params, is_async, arrow)
    }

    /// `(a, b) => body`. `open` is the consumed `(`.
    fn parse_arrow_with_parens(&mut self, start: usize, open: usize, is_async: bool) -> Parsed {
        let (params, close) = self.collect_arrow_params(open);
        let mut last = close;
        if self.is_arrow_with_single_param() {
            self.next();
            if let Some(arrow) = self.next() {
                last = arrow;
            }
        }
        self.parse_arrow_body(start, params, is_async, last)
    }

    /// Consumes a parameter list through its closing `)`, collecting plain
    /// identifiers in parameter position at the top level of the list.
    ///
    /// Destructuring patterns and default values are consumed but not
    /// modeled.
    fn collect_arrow_params(&mut self, open: usize) -> (Vec<Identifier>, usize) {
        let mut params = Vec::new();
        let mut depth = 1usize;
        let mut last = open;

        while self.peek().is_some_and(|t| !t.is_eof()) {
            let Some(index) = self.next() else {
                break;
            };
            let previous = last;
            last = index;

            let token = &self.tokens[index];
            match token.kind {
                kind if kind.is_open() => depth += 1,
                kind if kind.is_close() => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Identifier if depth == 1 => {
                    let prev = &self.tokens[previous];
                    let in_param_position = prev.kind == TokenKind::LeftParen
                        || prev.kind == TokenKind::Comma
                        || prev.is_operator("...");
                    if in_param_position {
                        params.push(self.identifier(index));
                    }
                }
                _ => {}
            }
        }

        (params, last)
    }

    /// Parses the arrow body after `=>` at `arrow`.
    ///
    /// Block bodies are skipped; expression bodies are parsed and kept when
    /// they are of a modeled shape.
    fn parse_arrow_body(
        &mut self,
        start: usize,
        params: Vec<Identifier>,
        is_async: bool,
        arrow: usize,
    ) -> Parsed {
        let mut body = None;
        let mut last = arrow;

        if self.peek_is(TokenKind::LeftBrace) {
            if let Some(open) = self.next() {
                last = self.consume_balanced(open);
            }
        } else if !self.at_boundary(arrow) {
            if let Some(first) = self.next() {
                let parsed = self.parse_expression(first);
                body = parsed.node.map(Box::new);
                last = parsed.last;
            }
        }

        Parsed::new(
            Expression::ArrowFunctionExpression(ArrowFunctionExpression {
                span: self.span_between(start, last),
                params,
                body,
                is_async,
            }),
            last,
        )
    }

    // ===== Objects and Arrays =====

    /// Parses an object literal after the consumed `{` at `open`.
    fn parse_object(&mut self, open: usize) -> Parsed {
        let id = self.alloc_id();
        let mut properties = Vec::new();
        let mut last = open;

        while let Some(kind) = self.peek().map(|t| t.kind) {
            match kind {
                TokenKind::Eof => break,
                TokenKind::RightBrace => {
                    if let Some(close) = self.next() {
                        last = close;
                    }
                    break;
                }
                TokenKind::Comma => {
                    if let Some(comma) = self.next() {
                        last = comma;
                    }
                }
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::String => {
                    let Some(key) = self.next() else {
                        break;
                    };
                    let (property, end) = self.parse_property(key);
                    properties.extend(property);
                    last = end;
                }
                TokenKind::LeftBracket => {
                    let Some(bracket) = self.next() else {
                        break;
                    };
                    last = self.skip_computed_property(bracket);
                }
                _ => {
                    let Some(first) = self.next() else {
                        break;
                    };
                    last = self.skip_expression_after_first(first);
                    trace!(line = self.tokens[first].line(), "skipped object member");
                }
            }
        }

        Parsed::new(
            Expression::ObjectExpression(ObjectExpression {
                span: self.span_between(open, last),
                id,
                properties,
            }),
            last,
        )
    }

    /// Parses one property whose key token at `key` has been consumed.
    fn parse_property(&mut self, key: usize) -> (Option<ObjectProperty>, usize) {
        let key_token = &self.tokens[key];

        // `get x() {}`, `set x(v) {}`, `async x() {}`
        let is_modifier = matches!(key_token.value.as_str(), "get" | "set" | "async")
            && key_token.kind == TokenKind::Identifier
            && self.peek().is_some_and(|t| {
                matches!(
                    t.kind,
                    TokenKind::Identifier
                        | TokenKind::Keyword
                        | TokenKind::String
                        | TokenKind::LeftBracket
                )
            });
        if is_modifier {
            return (None, self.skip_expression_after_first(key));
        }

        let property_key = match key_token.kind {
            TokenKind::String => PropertyKey::StringLiteral(StringLiteral {
                span: key_token.span,
                value: key_token.value.clone(),
            }),
            _ => PropertyKey::Identifier(self.identifier(key)),
        };

        let Some(next_kind) = self.peek().map(|t| t.kind) else {
            return (None, key);
        };

        if self.peek_is_operator(":") {
            let Some(colon) = self.next() else {
                return (None, key);
            };
            let (value, last) = self.property_value(colon);
            let property = ObjectProperty {
                span: self.span_between(key, last),
                key: property_key,
                value,
                shorthand: false,
                computed: false,
                method: false,
            };
            return (Some(property), last);
        }

        match next_kind {
            TokenKind::Comma | TokenKind::RightBrace | TokenKind::Eof => {
                let value = match &property_key {
                    PropertyKey::Identifier(id) => Some(Expression::Identifier(id.clone())),
                    PropertyKey::StringLiteral(_) => None,
                };
                let property = ObjectProperty {
                    span: self.span_between(key, key),
                    key: property_key,
                    value,
                    shorthand: true,
                    computed: false,
                    method: false,
                };
                (Some(property), key)
            }
            TokenKind::LeftParen => {
                let last = self.skip_method(key);
                let property = ObjectProperty {
                    span: self.span_between(key, last),
                    key: property_key,
                    value: None,
                    shorthand: false,
                    computed: false,
                    method: true,
                };
                (Some(property), last)
            }
            _ => {
                trace!(line = self.tokens[key].line(), "skipped object member");
                (None, self.skip_expression_after_first(key))
            }
        }
    }

    /// Parses a property value after the consumed `:` at `colon`.
    fn property_value(&mut self, colon: usize) -> (Option<Expression>, usize) {
        if self.at_boundary(colon) {
            return (None, colon);
        }
        match self.next() {
            Some(first) => {
                let parsed = self.parse_expression(first);
                (parsed.node, parsed.last)
            }
            None => (None, colon),
        }
    }

    /// Skips `(params) { body }` after a method name at `name`.
    fn skip_method(&mut self, name: usize) -> usize {
        let mut last = name;
        if let Some(open) = self.next() {
            last = self.consume_balanced(open);
        }
        if self.peek_is(TokenKind::LeftBrace) {
            if let Some(open) = self.next() {
                last = self.consume_balanced(open);
            }
        }
        last
    }

    /// Skips `[expr]: value` or `[expr]() {}` after the consumed `[`.
    fn skip_computed_property(&mut self, bracket: usize) -> usize {
        let mut last = self.consume_balanced(bracket);
        if self.peek_is_operator(":") {
            if let Some(colon) = self.next() {
                let (_, end) = self.property_value(colon);
                last = end;
            }
        } else if self.peek_is(TokenKind::LeftParen) {
            last = self.skip_method(last);
        }
        trace!(line = self.tokens[bracket].line(), "skipped computed property");
        last
    }

    /// Parses an array literal after the consumed `[` at `open`.
    fn parse_array(&mut self, open: usize) -> Parsed {
        let mut elements = Vec::new();
        let mut last = open;

        while let Some(kind) = self.peek().map(|t| t.kind) {
            match kind {
                TokenKind::Eof => break,
                TokenKind::RightBracket => {
                    if let Some(close) = self.next() {
                        last = close;
                    }
                    break;
                }
                TokenKind::Comma | TokenKind::Comment => {
                    if let Some(index) = self.next() {
                        last = index;
                    }
                }
                _ => {
                    let Some(first) = self.next() else {
                        break;
                    };
                    let parsed = self.parse_expression(first);
                    elements.extend(parsed.node);
                    last = parsed.last;
                }
            }
        }

        Parsed::new(
            Expression::ArrayExpression(ArrayExpression {
                span: self.span_between(open, last),
                elements,
            }),
            last,
        )
    }

    // ===== Unmodeled =====

    /// Skips `function name(params) { body }` after the consumed keyword.
    fn skip_function_expression(&mut self, keyword: usize) -> Parsed {
        let mut last = keyword;
        if self.peek_is_operator("*") {
            if let Some(star) = self.next() {
                last = star;
            }
        }
        if self.peek_is(TokenKind::Identifier) {
            if let Some(name) = self.next() {
                last = name;
            }
        }
        if self.peek_is(TokenKind::LeftParen) {
            if let Some(open) = self.next() {
                last = self.consume_balanced(open);
            }
        }
        if self.peek_is(TokenKind::LeftBrace) {
            if let Some(open) = self.next() {
                last = self.consume_balanced(open);
            }
        }
        trace!(line = self.tokens[keyword].line(), "skipped function expression");
        Parsed::skipped(last)
    }
}
