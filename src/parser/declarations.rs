//! Top-level declarations: `import`, `export` and `const`/`let`/`var`.

use tracing::trace;

use crate::ast::{
    ExportDefaultDeclaration, Expression, Identifier, ImportDeclaration, ImportSpecifier,
    SpecifierKind, StringLiteral, VariableDeclaration, VariableDeclarator, VariableKind,
};
use crate::tokenizer::TokenKind;
use crate::visitor::strip_quotes;

use super::Parser;

impl Parser {
    /// Parses an import declaration. `keyword` is the consumed `import`.
    ///
    /// Returns `None` for `import(…)` and `import.meta` statements, which
    /// are skipped as expressions.
    pub(super) fn import_declaration(&mut self, keyword: usize) -> Option<ImportDeclaration> {
        if self.peek_is(TokenKind::LeftParen) || self.peek_is_operator(".") {
            let last = self.skip_expression_after_first(keyword);
            self.eat_terminator(last);
            trace!(line = self.tokens[keyword].line(), "skipped dynamic import statement");
            return None;
        }

        let mut last = keyword;
        let mut specifiers = Vec::new();
        // `import 'side-effect'` has no clause and no `from`.
        let mut expects_source = self.peek_is(TokenKind::String);

        if !expects_source {
            // TypeScript `import type { … }`
            if self.peek().is_some_and(|t| t.is_identifier("type"))
                && self.peek_next().is_some_and(|t| {
                    t.kind == TokenKind::LeftBrace
                        || t.is_operator("*")
                        || (t.kind == TokenKind::Identifier && !t.is_identifier("from"))
                })
            {
                if let Some(index) = self.next() {
                    last = index;
                }
            }

            if self.peek_is(TokenKind::Identifier)
                && !self.peek().is_some_and(|t| t.is_identifier("from"))
            {
                if let Some(index) = self.next() {
                    let local = self.identifier(index);
                    specifiers.push(ImportSpecifier {
                        span: local.span,
                        specifier_kind: SpecifierKind::Default,
                        imported: local.clone(),
                        local,
                    });
                    last = index;
                }
                if self.peek_is(TokenKind::Comma) {
                    if let Some(index) = self.next() {
                        last = index;
                    }
                }
            }

            if self.peek_is_operator("*") {
                last = self.namespace_specifier(&mut specifiers);
            } else if self.peek_is(TokenKind::LeftBrace) {
                last = self.named_specifiers(&mut specifiers);
            }

            if self.peek().is_some_and(|t| t.is_identifier("from")) {
                if let Some(index) = self.next() {
                    last = index;
                    expects_source = true;
                }
            }
        }

        let mut source = None;
        if expects_source && self.peek_is(TokenKind::String) {
            if let Some(index) = self.next() {
                let token = &self.tokens[index];
                source = Some(StringLiteral {
                    span: token.span,
                    value: token.value.clone(),
                });
                last = index;
            }
        } else {
            trace!(
                line = self.tokens[keyword].line(),
                "import declaration without a source"
            );
        }

        last = self.eat_terminator(last);

        Some(ImportDeclaration {
            span: self.span_between(keyword, last),
            specifiers,
            source,
        })
    }

    /// `* as name`. Returns the last consumed token.
    fn namespace_specifier(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> usize {
        let Some(star) = self.next() else {
            return self.index.saturating_sub(1);
        };
        let mut last = star;
        if self.peek().is_some_and(|t| t.is_identifier("as")) {
            if let Some(index) = self.next() {
                last = index;
            }
        }
        if self.peek_is(TokenKind::Identifier)
            && !self.peek().is_some_and(|t| t.is_identifier("from"))
        {
            if let Some(index) = self.next() {
                let local = self.identifier(index);
                specifiers.push(ImportSpecifier {
                    span: self.span_between(star, index),
                    specifier_kind: SpecifierKind::Namespace,
                    imported: local.clone(),
                    local,
                });
                last = index;
            }
        }
        last
    }

    /// `{ a, b as c, default as d }`. Returns the last consumed token.
    ///
    /// An unterminated list ends before the first token that cannot be a
    /// specifier, so a following statement is left intact.
    fn named_specifiers(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> usize {
        let Some(open) = self.next() else {
            return self.index.saturating_sub(1);
        };
        let mut last = open;

        while let Some(kind) = self.peek().map(|t| t.kind) {
            match kind {
                TokenKind::RightBrace => {
                    if let Some(index) = self.next() {
                        last = index;
                    }
                    break;
                }
                TokenKind::Comma => {
                    if let Some(index) = self.next() {
                        last = index;
                    }
                }
                TokenKind::Identifier | TokenKind::String => {
                    last = self.named_specifier(specifiers);
                }
                // Reserved words are only valid here when renamed.
                TokenKind::Keyword if self.peek_next().is_some_and(|t| t.is_identifier("as")) => {
                    last = self.named_specifier(specifiers);
                }
                _ => break,
            }
        }

        last
    }

    fn named_specifier(&mut self, specifiers: &mut Vec<ImportSpecifier>) -> usize {
        let Some(mut imported_index) = self.next() else {
            return self.index.saturating_sub(1);
        };

        // `{ type Foo }`
        if self.tokens[imported_index].is_identifier("type")
            && self
                .peek()
                .is_some_and(|t| t.kind == TokenKind::Identifier && !t.is_identifier("as"))
        {
            if let Some(index) = self.next() {
                imported_index = index;
            }
        }

        let imported = self.specifier_name(imported_index);
        let mut local_index = imported_index;
        if self.peek().is_some_and(|t| t.is_identifier("as")) {
            if let Some(as_index) = self.next() {
                local_index = as_index;
            }
            if self
                .peek()
                .is_some_and(|t| matches!(t.kind, TokenKind::Identifier | TokenKind::Keyword))
            {
                if let Some(index) = self.next() {
                    local_index = index;
                }
            }
        }
        let local = if local_index == imported_index {
            imported.clone()
        } else {
            self.identifier(local_index)
        };

        specifiers.push(ImportSpecifier {
            span: self.span_between(imported_index, local_index),
            specifier_kind: SpecifierKind::Named,
            imported,
            local,
        });
        local_index
    }

    /// An identifier for a specifier token; string names lose their quotes.
    fn specifier_name(&self, index: usize) -> Identifier {
        let token = &self.tokens[index];
        Identifier {
            span: token.span,
            name: strip_quotes(&token.value).to_string(),
        }
    }

    /// Parses an `export` statement. `keyword` is the consumed `export`.
    ///
    /// Only `export default` produces a node. Export lists and re-exports
    /// are consumed; `export const …`, `export function …` and friends
    /// leave the declaration in place for the top-level loop.
    pub(super) fn export_declaration(
        &mut self,
        keyword: usize,
    ) -> Option<ExportDefaultDeclaration> {
        let token = self.peek()?;
        let is_default = token.is_keyword("default");
        let is_clause = token.kind == TokenKind::LeftBrace || token.is_operator("*");

        if !is_default {
            if is_clause {
                self.skip_export_clause();
            }
            return None;
        }

        let mut last = self.next()?;
        let mut declaration = None;
        if !self.at_boundary(last) {
            if let Some(first) = self.next() {
                let parsed = self.parse_expression(first);
                declaration = parsed.node;
                last = parsed.last;
            }
        }
        last = self.eat_terminator(last);

        Some(ExportDefaultDeclaration {
            span: self.span_between(keyword, last),
            declaration,
        })
    }

    /// `{ … } from '…';` or `* as ns from '…';`
    fn skip_export_clause(&mut self) {
        let Some(first) = self.next() else {
            return;
        };
        let mut last = if self.tokens[first].kind == TokenKind::LeftBrace {
            self.consume_balanced(first)
        } else {
            self.skip_expression_after_first(first)
        };
        if self.peek().is_some_and(|t| t.is_identifier("from")) {
            if let Some(index) = self.next() {
                last = index;
            }
            if self.peek_is(TokenKind::String) {
                if let Some(index) = self.next() {
                    last = index;
                }
            }
        }
        let last = self.eat_terminator(last);
        trace!(line = self.tokens[last].line(), "skipped export clause");
    }

    /// Parses a variable declaration. `keyword` is the consumed
    /// `const`, `let` or `var`.
    pub(super) fn variable_declaration(&mut self, keyword: usize) -> VariableDeclaration {
        let kind = VariableKind::from_keyword(&self.tokens[keyword].value)
            .unwrap_or(VariableKind::Var);
        let mut declarations = Vec::new();
        let mut last = keyword;

        while let Some(kind) = self.peek().map(|t| t.kind) {
            match kind {
                TokenKind::Identifier => {
                    let Some(id_index) = self.next() else {
                        break;
                    };
                    let (declarator, end) = self.variable_declarator(id_index);
                    declarations.push(declarator);
                    last = end;
                }
                TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    let Some(open) = self.next() else {
                        break;
                    };
                    last = self.destructuring_declarator(open);
                }
                TokenKind::Eof | TokenKind::Keyword | TokenKind::Comma => break,
                _ if kind.is_close() || self.peek_is_operator(";") => break,
                _ => {
                    if let Some(index) = self.next() {
                        last = index;
                    }
                    continue;
                }
            }

            if self.peek_is(TokenKind::Comma) {
                if let Some(index) = self.next() {
                    last = index;
                }
                continue;
            }
            break;
        }

        last = self.eat_terminator(last);

        VariableDeclaration {
            span: self.span_between(keyword, last),
            kind,
            declarations,
        }
    }

    fn variable_declarator(&mut self, id_index: usize) -> (VariableDeclarator, usize) {
        let id = self.identifier(id_index);
        let (init, last) = self.initializer(id_index);
        let declarator = VariableDeclarator {
            span: self.span_between(id_index, last),
            id,
            init,
        };
        (declarator, last)
    }

    /// `{ a, b } = value` or `[a, b] = value`; produces no declarator.
    fn destructuring_declarator(&mut self, open: usize) -> usize {
        let pattern_end = self.consume_balanced(open);
        let (_, last) = self.initializer(pattern_end);
        trace!(
            line = self.tokens[open].line(),
            "skipped destructuring declarator"
        );
        last
    }

    /// Parses an optional `= expression` following the token at `last`.
    fn initializer(&mut self, last: usize) -> (Option<Expression>, usize) {
        if !self.peek_is_operator("=") {
            return (None, last);
        }
        let Some(equals) = self.next() else {
            return (None, last);
        };
        if self.at_boundary(equals) {
            return (None, equals);
        }
        match self.next() {
            Some(first) => {
                let parsed = self.parse_expression(first);
                (parsed.node, parsed.last)
            }
            None => (None, equals),
        }
    }
}
