//! AST traversal.
//!
//! [`Visitor`] has one method per node type. Each defaults to the matching
//! `walk_*` function, which visits the node's children, so an implementation
//! overrides only the nodes it cares about and calls the `walk_*` function
//! from its override when it still wants to descend.
//!
//! Two collectors are built on top:
//!
//! - [`ImportVisitor`]: one [`ImportRecord`] per import declaration
//! - [`ObjectVisitor`]: every object literal with the dotted name path
//!   it was found under
//!
//! # Example
//!
//! ```
//! use jsxscope::ast::Identifier;
//! use jsxscope::parser::Parser;
//! use jsxscope::visitor::Visitor;
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl<'ast> Visitor<'ast> for Names {
//!     fn visit_identifier(&mut self, id: &'ast Identifier) {
//!         self.0.push(id.name.clone());
//!     }
//! }
//!
//! let file = Parser::from_source("const a = b(c);").parse(false);
//! let mut names = Names::default();
//! names.visit_file(&file);
//! assert_eq!(names.0, vec!["a", "b", "c"]);
//! ```

pub mod imports;
pub mod objects;

pub use imports::{ImportRecord, ImportVisitor};
pub use objects::{ObjectRecord, ObjectVisitor};

use crate::ast::{
    ArrayExpression, ArrowFunctionExpression, CallExpression, ExportDefaultDeclaration,
    Expression, File, Identifier, ImportDeclaration, ImportExpression, ImportSpecifier,
    MemberExpression, NumericLiteral, ObjectExpression, ObjectProperty, Program, PropertyKey,
    Statement, StringLiteral, VariableDeclaration, VariableDeclarator,
};

/// Removes one pair of surrounding quotes (`'`, `"` or `` ` ``).
///
/// Unbalanced or missing quotes are left alone, except that a lone leading
/// quote from an unterminated literal is dropped.
pub fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match chars.next() {
        Some(quote @ ('\'' | '"' | '`')) => {
            let inner = &value[1..];
            inner.strip_suffix(quote).unwrap_or(inner)
        }
        _ => value,
    }
}

/// A traversal over the AST. See the module docs.
pub trait Visitor<'ast> {
    fn visit_file(&mut self, file: &'ast File) {
        walk_file(self, file);
    }

    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_statement(&mut self, statement: &'ast Statement) {
        walk_statement(self, statement);
    }

    fn visit_import_declaration(&mut self, decl: &'ast ImportDeclaration) {
        walk_import_declaration(self, decl);
    }

    fn visit_import_specifier(&mut self, specifier: &'ast ImportSpecifier) {
        walk_import_specifier(self, specifier);
    }

    fn visit_export_default_declaration(&mut self, decl: &'ast ExportDefaultDeclaration) {
        walk_export_default_declaration(self, decl);
    }

    fn visit_variable_declaration(&mut self, decl: &'ast VariableDeclaration) {
        walk_variable_declaration(self, decl);
    }

    fn visit_variable_declarator(&mut self, declarator: &'ast VariableDeclarator) {
        walk_variable_declarator(self, declarator);
    }

    fn visit_expression(&mut self, expr: &'ast Expression) {
        walk_expression(self, expr);
    }

    fn visit_identifier(&mut self, _id: &'ast Identifier) {}

    fn visit_string_literal(&mut self, _lit: &'ast StringLiteral) {}

    fn visit_numeric_literal(&mut self, _lit: &'ast NumericLiteral) {}

    fn visit_object_expression(&mut self, object: &'ast ObjectExpression) {
        walk_object_expression(self, object);
    }

    fn visit_object_property(&mut self, property: &'ast ObjectProperty) {
        walk_object_property(self, property);
    }

    fn visit_property_key(&mut self, key: &'ast PropertyKey) {
        walk_property_key(self, key);
    }

    fn visit_array_expression(&mut self, array: &'ast ArrayExpression) {
        walk_array_expression(self, array);
    }

    fn visit_call_expression(&mut self, call: &'ast CallExpression) {
        walk_call_expression(self, call);
    }

    fn visit_arrow_function_expression(&mut self, arrow: &'ast ArrowFunctionExpression) {
        walk_arrow_function_expression(self, arrow);
    }

    fn visit_import_expression(&mut self, _expr: &'ast ImportExpression) {}

    fn visit_member_expression(&mut self, member: &'ast MemberExpression) {
        walk_member_expression(self, member);
    }
}

// ===== Walk Functions =====

pub fn walk_file<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, file: &'ast File) {
    visitor.visit_program(&file.program);
}

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, program: &'ast Program) {
    for statement in &program.body {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    statement: &'ast Statement,
) {
    match statement {
        Statement::ImportDeclaration(decl) => visitor.visit_import_declaration(decl),
        Statement::ExportDefaultDeclaration(decl) => {
            visitor.visit_export_default_declaration(decl)
        }
        Statement::VariableDeclaration(decl) => visitor.visit_variable_declaration(decl),
    }
}

pub fn walk_import_declaration<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast ImportDeclaration,
) {
    for specifier in &decl.specifiers {
        visitor.visit_import_specifier(specifier);
    }
    if let Some(source) = &decl.source {
        visitor.visit_string_literal(source);
    }
}

pub fn walk_import_specifier<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    specifier: &'ast ImportSpecifier,
) {
    visitor.visit_identifier(&specifier.imported);
    if specifier.local != specifier.imported {
        visitor.visit_identifier(&specifier.local);
    }
}

pub fn walk_export_default_declaration<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast ExportDefaultDeclaration,
) {
    if let Some(expr) = &decl.declaration {
        visitor.visit_expression(expr);
    }
}

pub fn walk_variable_declaration<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast VariableDeclaration,
) {
    for declarator in &decl.declarations {
        visitor.visit_variable_declarator(declarator);
    }
}

pub fn walk_variable_declarator<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    declarator: &'ast VariableDeclarator,
) {
    visitor.visit_identifier(&declarator.id);
    if let Some(init) = &declarator.init {
        visitor.visit_expression(init);
    }
}

/// Dispatches on the expression variant.
pub fn walk_expression<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Identifier(id) => visitor.visit_identifier(id),
        Expression::StringLiteral(lit) => visitor.visit_string_literal(lit),
        Expression::NumericLiteral(lit) => visitor.visit_numeric_literal(lit),
        Expression::ObjectExpression(object) => visitor.visit_object_expression(object),
        Expression::ArrayExpression(array) => visitor.visit_array_expression(array),
        Expression::CallExpression(call) => visitor.visit_call_expression(call),
        Expression::ArrowFunctionExpression(arrow) => {
            visitor.visit_arrow_function_expression(arrow)
        }
        Expression::ImportExpression(import) => visitor.visit_import_expression(import),
        Expression::MemberExpression(member) => visitor.visit_member_expression(member),
    }
}

pub fn walk_object_expression<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    object: &'ast ObjectExpression,
) {
    for property in &object.properties {
        visitor.visit_object_property(property);
    }
}

pub fn walk_object_property<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    property: &'ast ObjectProperty,
) {
    visitor.visit_property_key(&property.key);
    // A shorthand value repeats the key.
    if property.shorthand {
        return;
    }
    if let Some(value) = &property.value {
        visitor.visit_expression(value);
    }
}

pub fn walk_property_key<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, key: &'ast PropertyKey) {
    match key {
        PropertyKey::Identifier(id) => visitor.visit_identifier(id),
        PropertyKey::StringLiteral(lit) => visitor.visit_string_literal(lit),
    }
}

pub fn walk_array_expression<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    array: &'ast ArrayExpression,
) {
    for element in &array.elements {
        visitor.visit_expression(element);
    }
}

pub fn walk_call_expression<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    call: &'ast CallExpression,
) {
    visitor.visit_expression(&call.callee);
    for argument in &call.arguments {
        visitor.visit_expression(argument);
    }
}

pub fn walk_arrow_function_expression<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    arrow: &'ast ArrowFunctionExpression,
) {
    for param in &arrow.params {
        visitor.visit_identifier(param);
    }
    if let Some(body) = &arrow.body {
        visitor.visit_expression(body);
    }
}

pub fn walk_member_expression<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    member: &'ast MemberExpression,
) {
    visitor.visit_expression(&member.object);
    visitor.visit_identifier(&member.property);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::parser::Parser;

    /// Records the kind of every expression it reaches.
    #[derive(Default)]
    struct KindCounter {
        kinds: Vec<NodeKind>,
    }

    impl<'ast> Visitor<'ast> for KindCounter {
        fn visit_expression(&mut self, expr: &'ast Expression) {
            self.kinds.push(expr.kind());
            walk_expression(self, expr);
        }
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'react'"), "react");
        assert_eq!(strip_quotes("\"./App\""), "./App");
        assert_eq!(strip_quotes("`tpl`"), "tpl");
        assert_eq!(strip_quotes("'unterminated"), "unterminated");
        assert_eq!(strip_quotes("bare"), "bare");
        assert_eq!(strip_quotes("'mixed\""), "mixed\"");
        assert_eq!(strip_quotes(""), "");
    }

    #[test]
    fn test_walk_reaches_nested_expressions() {
        let file = Parser::from_source(
            "export default [{ lazy: () => import('./A'), meta: React.memo(B) }];",
        )
        .parse(false);
        let mut counter = KindCounter::default();
        counter.visit_file(&file);
        assert_eq!(
            counter.kinds,
            vec![
                NodeKind::ArrayExpression,
                NodeKind::ObjectExpression,
                NodeKind::ArrowFunctionExpression,
                NodeKind::CallExpression,
                NodeKind::ImportExpression,
                NodeKind::StringLiteral,
                NodeKind::CallExpression,
                NodeKind::MemberExpression,
                NodeKind::Identifier,
                NodeKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_shorthand_value_is_not_visited_twice() {
        #[derive(Default)]
        struct Idents(usize);
        impl<'ast> Visitor<'ast> for Idents {
            fn visit_identifier(&mut self, _id: &'ast Identifier) {
                self.0 += 1;
            }
        }

        let file = Parser::from_source("const o = { a, b };").parse(false);
        let mut idents = Idents::default();
        idents.visit_file(&file);
        // `o`, `a`, `b`
        assert_eq!(idents.0, 3);
    }
}
