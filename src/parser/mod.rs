//! Speculative recursive-descent parser for JavaScript/JSX.
//!
//! The parser models the subset of the language that import/export and
//! object-literal analysis needs and skips everything else. Skipping never
//! fails: every routine reports the last token it consumed, so after an
//! unsupported construct the cursor always lands on a statement or argument
//! boundary and parsing carries on.
//!
//! # Structure
//!
//! - [`Parser`] owns the token stream and a cursor (this module)
//! - `declarations`: `import`, `export default` and `const`/`let`/`var`
//! - `expressions`: the shared expression dispatcher, calls, member chains,
//!   arrow functions, objects and arrays
//! - `skip`: balanced-region skippers and boundary detection
//!
//! # Example
//!
//! ```
//! use jsxscope::parser::Parser;
//! use jsxscope::visitor::ImportVisitor;
//!
//! let source = "import { useState, useEffect } from 'react';";
//! let file = Parser::from_source(source).parse(true);
//! let imports = ImportVisitor::collect(&file);
//! assert_eq!(imports[0].source_path, "react");
//! assert_eq!(imports[0].imported_names, vec!["useState", "useEffect"]);
//! ```

mod declarations;
mod expressions;
mod skip;

use tracing::debug;

use crate::ast::{Expression, File, Identifier, NodeId, Program, SourceType, Span, Statement};
use crate::tokenizer::{Lexer, Token, TokenKind, VARIABLE_KEYWORDS};

/// Result of every parsing routine: the node, if one was built, and the
/// index of the last token consumed.
///
/// `last` is always valid even when `node` is `None`, which is how callers
/// stay in sync after skipping an unsupported construct.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Parsed {
    pub node: Option<Expression>,
    pub last: usize,
}

impl Parsed {
    fn new(node: Expression, last: usize) -> Self {
        Self {
            node: Some(node),
            last,
        }
    }

    fn skipped(last: usize) -> Self {
        Self { node: None, last }
    }
}

/// A cursor over a token stream that produces a [`File`].
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    next_id: u32,
}

impl Parser {
    /// Creates a parser over `tokens`.
    ///
    /// Comment tokens are dropped. If the stream does not end with an
    /// [`TokenKind::Eof`] token, one is appended after the last token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        if tokens.last().map_or(true, |t| !t.is_eof()) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or_default();
            tokens.push(Token::eof(end));
        }
        Self {
            tokens,
            index: 0,
            next_id: 0,
        }
    }

    /// Tokenizes `source` and creates a parser over the result.
    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::tokenize(source))
    }

    /// Parses the token stream into a [`File`].
    ///
    /// # Arguments
    ///
    /// * `import_only` - Stop at the first top-level keyword other than
    ///   `import`. An `export` statement met there is still parsed, but
    ///   nothing after it is. Use this for cheap dependency scans; the
    ///   returned tree is then incomplete.
    ///
    /// # Returns
    ///
    /// The file node. Parsing is infallible: unsupported or malformed
    /// constructs are skipped. Each call starts over from the first token.
    pub fn parse(&mut self, import_only: bool) -> File {
        self.index = 0;
        self.next_id = 0;

        let body = self.parse_program_body(import_only);
        let end = self
            .tokens
            .last()
            .map(|t| t.span.end)
            .unwrap_or_default();
        let span = Span::new(Default::default(), end);

        debug!(
            statements = body.len(),
            tokens = self.tokens.len(),
            import_only,
            "parsed program"
        );

        File {
            span,
            program: Program {
                span,
                source_type: SourceType::Module,
                body,
            },
        }
    }

    /// The tokens being parsed, comments excluded.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the next token to be consumed.
    pub fn cursor(&self) -> usize {
        self.index
    }

    fn parse_program_body(&mut self, import_only: bool) -> Vec<Statement> {
        let mut body = Vec::new();

        while let Some(index) = self.next() {
            let token = &self.tokens[index];
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Keyword => {
                    let keyword = token.value.clone();
                    if keyword == "import" {
                        if let Some(decl) = self.import_declaration(index) {
                            body.push(Statement::ImportDeclaration(decl));
                        }
                        continue;
                    }
                    if keyword == "export" {
                        if let Some(decl) = self.export_declaration(index) {
                            body.push(Statement::ExportDefaultDeclaration(decl));
                        }
                    }
                    if import_only {
                        break;
                    }
                    if VARIABLE_KEYWORDS.contains(&keyword.as_str()) {
                        let decl = self.variable_declaration(index);
                        body.push(Statement::VariableDeclaration(decl));
                    }
                }
                // Everything else, including block braces, is stepped over
                // one token at a time.
                _ => {}
            }
        }

        body
    }

    // ===== Cursor =====

    /// Consumes the current token and returns its index.
    fn next(&mut self) -> Option<usize> {
        if self.at_end() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(index)
    }

    /// The current token, without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// The token after the current one, without consuming anything.
    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.index + 1)
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn peek_is_operator(&self, op: &str) -> bool {
        self.peek().is_some_and(|t| t.is_operator(op))
    }

    /// Consumes the current token if it is `;`.
    fn eat_terminator(&mut self, last: usize) -> usize {
        if self.peek_is_operator(";") {
            if let Some(index) = self.next() {
                return index;
            }
        }
        last
    }

    // ===== Node Construction =====

    fn span_between(&self, first: usize, last: usize) -> Span {
        Span::between(self.tokens[first].span, self.tokens[last].span)
    }

    fn identifier(&self, index: usize) -> Identifier {
        let token = &self.tokens[index];
        Identifier {
            span: token.span,
            name: token.value.clone(),
        }
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}
