//! Object literal collection.
//!
//! [`ObjectVisitor`] walks the whole tree and records every
//! [`ObjectExpression`] together with the names of the enclosing contexts:
//! the variable it initializes, the property it is the value of, and
//! `default` for `export default`. In
//!
//! ```text
//! const routes = { home: { path: '/' } };
//! ```
//!
//! the outer object is found under `routes` and the inner one under
//! `routes.home`.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::ast::{
    ExportDefaultDeclaration, File, ImportDeclaration, NodeId, ObjectExpression, ObjectProperty,
    VariableDeclarator,
};

use super::{
    walk_export_default_declaration, walk_object_expression, walk_variable_declarator, Visitor,
};

/// An object literal and the dotted path it was found under.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectRecord<'ast> {
    /// `None` when no named context encloses the object.
    pub path: Option<String>,
    pub expression: &'ast ObjectExpression,
}

impl ObjectRecord<'_> {
    pub fn property_count(&self) -> usize {
        self.expression.properties.len()
    }
}

impl fmt::Display for ObjectRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> ObjectExpression",
            self.path.as_deref().unwrap_or("<anonymous>")
        )
    }
}

/// Collects every object literal reachable from the program body.
///
/// Each object is recorded once, keyed by its [`NodeId`].
#[derive(Debug, Default)]
pub struct ObjectVisitor<'ast> {
    records: Vec<ObjectRecord<'ast>>,
    names: Vec<String>,
    seen: HashSet<NodeId>,
}

impl<'ast> ObjectVisitor<'ast> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            names: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Collects the object records of `file`, outermost first.
    ///
    /// # Example
    ///
    /// ```
    /// use jsxscope::parser::Parser;
    /// use jsxscope::visitor::ObjectVisitor;
    ///
    /// let source = "const config = { path: '/home', title: 'Home' };";
    /// let file = Parser::from_source(source).parse(false);
    /// let records = ObjectVisitor::collect(&file);
    /// assert_eq!(records.len(), 1);
    /// assert_eq!(records[0].path.as_deref(), Some("config"));
    /// assert_eq!(records[0].property_count(), 2);
    /// ```
    pub fn collect(file: &'ast File) -> Vec<ObjectRecord<'ast>> {
        let mut visitor = Self::new();
        visitor.visit_file(file);
        visitor.into_records()
    }

    pub fn records(&self) -> &[ObjectRecord<'ast>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ObjectRecord<'ast>> {
        self.records
    }

    /// Pushes a trimmed, non-empty name. Returns whether anything was
    /// pushed so the caller knows to pop.
    fn push_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    fn current_path(&self) -> Option<String> {
        if self.names.is_empty() {
            None
        } else {
            Some(self.names.join("."))
        }
    }

    fn with_name(&mut self, name: Option<&str>, walk: impl FnOnce(&mut Self)) {
        let pushed = name.is_some_and(|n| self.push_name(n));
        walk(self);
        if pushed {
            self.names.pop();
        }
    }
}

impl<'ast> Visitor<'ast> for ObjectVisitor<'ast> {
    fn visit_import_declaration(&mut self, _decl: &'ast ImportDeclaration) {}

    fn visit_export_default_declaration(&mut self, decl: &'ast ExportDefaultDeclaration) {
        self.with_name(Some("default"), |v| walk_export_default_declaration(v, decl));
    }

    fn visit_variable_declarator(&mut self, declarator: &'ast VariableDeclarator) {
        self.with_name(Some(declarator.id.name.as_str()), |v| {
            walk_variable_declarator(v, declarator)
        });
    }

    fn visit_object_expression(&mut self, object: &'ast ObjectExpression) {
        if !self.seen.insert(object.id) {
            return;
        }
        self.records.push(ObjectRecord {
            path: self.current_path(),
            expression: object,
        });
        walk_object_expression(self, object);
    }

    fn visit_object_property(&mut self, property: &'ast ObjectProperty) {
        if property.shorthand {
            return;
        }
        let Some(value) = &property.value else {
            return;
        };
        self.with_name(property.key_name(), |v| v.visit_expression(value));
    }
}
