//! Import declaration collection.

use serde::{Deserialize, Serialize};

use crate::ast::{ExportDefaultDeclaration, File, ImportDeclaration, VariableDeclaration};

use super::Visitor;

/// One import declaration: where it imports from and which names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Module source with quotes removed (e.g. `react`, `./App`).
    pub source_path: String,
    /// Imported name of every specifier, in declaration order. Empty for
    /// side-effect imports.
    pub imported_names: Vec<String>,
}

impl ImportRecord {
    /// Returns true if the record imports `name`.
    pub fn imports(&self, name: &str) -> bool {
        self.imported_names.iter().any(|n| n == name)
    }
}

/// Collects one [`ImportRecord`] per import declaration that has a source.
///
/// Only top-level statements are inspected; nothing below an import
/// declaration is visited.
#[derive(Debug, Default)]
pub struct ImportVisitor {
    records: Vec<ImportRecord>,
}

impl ImportVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the import records of `file`.
    ///
    /// # Example
    ///
    /// ```
    /// use jsxscope::parser::Parser;
    /// use jsxscope::visitor::ImportVisitor;
    ///
    /// let file = Parser::from_source("import Logo from './assets/logo.svg';").parse(true);
    /// let records = ImportVisitor::collect(&file);
    /// assert_eq!(records[0].source_path, "./assets/logo.svg");
    /// assert_eq!(records[0].imported_names, vec!["Logo"]);
    /// ```
    pub fn collect(file: &File) -> Vec<ImportRecord> {
        let mut visitor = Self::new();
        visitor.visit_file(file);
        visitor.into_records()
    }

    pub fn records(&self) -> &[ImportRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ImportRecord> {
        self.records
    }
}

impl<'ast> Visitor<'ast> for ImportVisitor {
    fn visit_import_declaration(&mut self, decl: &'ast ImportDeclaration) {
        let Some(source) = &decl.source else {
            return;
        };
        self.records.push(ImportRecord {
            source_path: source.unquoted().to_string(),
            imported_names: decl
                .specifiers
                .iter()
                .map(|s| s.imported.name.clone())
                .collect(),
        });
    }

    fn visit_export_default_declaration(&mut self, _decl: &'ast ExportDefaultDeclaration) {}

    fn visit_variable_declaration(&mut self, _decl: &'ast VariableDeclaration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn collect(source: &str) -> Vec<ImportRecord> {
        ImportVisitor::collect(&Parser::from_source(source).parse(false))
    }

    #[test]
    fn test_named_imports() {
        let records = collect("import { useState, useEffect } from 'react';");
        assert_eq!(
            records,
            vec![ImportRecord {
                source_path: "react".to_string(),
                imported_names: vec!["useState".to_string(), "useEffect".to_string()],
            }]
        );
    }

    #[test]
    fn test_one_record_per_declaration() {
        let records = collect(
            "import React, { lazy } from 'react';\nimport * as api from \"./api\";\n\
             import './app.css';\nconst x = 1;\nimport { a as b } from '@/utils';",
        );
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].imported_names, vec!["React", "lazy"]);
        assert_eq!(records[1].source_path, "./api");
        assert_eq!(records[1].imported_names, vec!["api"]);
        assert!(records[2].imported_names.is_empty());
        assert_eq!(records[3].source_path, "@/utils");
        assert_eq!(records[3].imported_names, vec!["a"]);
        assert!(records[3].imports("a"));
        assert!(!records[3].imports("b"));
    }

    #[test]
    fn test_declarations_without_source_are_ignored() {
        let records = collect("import { a } 'x';\nimport b from 'b';");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_path, "b");
    }

    #[test]
    fn test_collection_is_idempotent() {
        let file =
            Parser::from_source("import a from 'a';\nimport { b, c } from 'bc';").parse(false);
        let first = ImportVisitor::collect(&file);
        let second = ImportVisitor::collect(&file);
        assert_eq!(first, second);

        let mut visitor = ImportVisitor::new();
        visitor.visit_file(&file);
        assert_eq!(visitor.records(), first.as_slice());
    }

    #[test]
    fn test_record_serializes() {
        let records = collect("import { a } from 'm';");
        let json = serde_json::to_string(&records[0]).unwrap();
        assert_eq!(json, r#"{"source_path":"m","imported_names":["a"]}"#);
    }
}
