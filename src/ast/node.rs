//! AST node definitions.
//!
//! The tree is a closed set of node types. Statements and expressions are
//! enums over concrete node structs, so traversal is an exhaustive `match`.
//! A parent owns its children; nothing is shared and the tree is immutable
//! once [`Parser::parse`](crate::parser::Parser::parse) returns it.

use serde::Serialize;
use std::fmt;

use super::span::Span;
use crate::visitor::strip_quotes;

/// Identity of a node within one parse, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

/// The tag of every node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    File,
    Program,
    ImportDeclaration,
    ImportSpecifier,
    ExportDefaultDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    Identifier,
    StringLiteral,
    NumericLiteral,
    ObjectExpression,
    ObjectProperty,
    ArrayExpression,
    CallExpression,
    ArrowFunctionExpression,
    ImportExpression,
    MemberExpression,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Common accessors for every node.
pub trait Spanned {
    /// The node's variant tag.
    fn kind(&self) -> NodeKind;

    /// The node's source range.
    fn span(&self) -> Span;

    /// Byte offset where the node starts.
    fn start(&self) -> usize {
        self.span().start.offset
    }

    /// Byte offset one past the node's end.
    fn end(&self) -> usize {
        self.span().end.offset
    }
}

macro_rules! impl_spanned {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Spanned for $ty {
                fn kind(&self) -> NodeKind {
                    NodeKind::$ty
                }

                fn span(&self) -> Span {
                    self.span
                }
            }
        )*
    };
}

impl_spanned!(
    File,
    Program,
    ImportDeclaration,
    ImportSpecifier,
    ExportDefaultDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    Identifier,
    StringLiteral,
    NumericLiteral,
    ObjectExpression,
    ObjectProperty,
    ArrayExpression,
    CallExpression,
    ArrowFunctionExpression,
    ImportExpression,
    MemberExpression,
);

// ===== Root =====

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct File {
    pub span: Span,
    pub program: Program,
}

/// Whether the source is an ES module or a classic script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Module,
    Script,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub span: Span,
    pub source_type: SourceType,
    /// Top-level statements in source order.
    pub body: Vec<Statement>,
}

/// A modeled top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    ImportDeclaration(ImportDeclaration),
    ExportDefaultDeclaration(ExportDefaultDeclaration),
    VariableDeclaration(VariableDeclaration),
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::ImportDeclaration(n) => n.kind(),
            Statement::ExportDefaultDeclaration(n) => n.kind(),
            Statement::VariableDeclaration(n) => n.kind(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::ImportDeclaration(n) => n.span,
            Statement::ExportDefaultDeclaration(n) => n.span,
            Statement::VariableDeclaration(n) => n.span,
        }
    }

    pub fn as_import(&self) -> Option<&ImportDeclaration> {
        match self {
            Statement::ImportDeclaration(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_export_default(&self) -> Option<&ExportDefaultDeclaration> {
        match self {
            Statement::ExportDefaultDeclaration(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDeclaration> {
        match self {
            Statement::VariableDeclaration(n) => Some(n),
            _ => None,
        }
    }
}

// ===== Declarations =====

/// `import … from '…'`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDeclaration {
    pub span: Span,
    pub specifiers: Vec<ImportSpecifier>,
    /// The module source. `None` when the statement had no recognizable
    /// `from '…'` clause.
    pub source: Option<StringLiteral>,
}

/// How a binding is brought in by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecifierKind {
    /// `import foo from 'm'`
    Default,
    /// `import { foo } from 'm'` or `import { foo as bar } from 'm'`
    Named,
    /// `import * as foo from 'm'`
    Namespace,
}

/// One binding of an import declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSpecifier {
    pub span: Span,
    pub specifier_kind: SpecifierKind,
    /// The name as written on the exporting side (the local name for
    /// default and namespace specifiers).
    pub imported: Identifier,
    /// The binding introduced in the importing file.
    pub local: Identifier,
}

/// `export default <expression>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDefaultDeclaration {
    pub span: Span,
    /// The exported expression, when it is of a modeled shape.
    pub declaration: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

impl VariableKind {
    /// Maps a declaration keyword to its kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "const" => Some(VariableKind::Const),
            "let" => Some(VariableKind::Let),
            "var" => Some(VariableKind::Var),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Const => "const",
            VariableKind::Let => "let",
            VariableKind::Var => "var",
        }
    }
}

/// `const a = …, b = …;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub span: Span,
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclarator {
    pub span: Span,
    pub id: Identifier,
    pub init: Option<Expression>,
}

// ===== Expressions =====

/// A modeled expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    NumericLiteral(NumericLiteral),
    ObjectExpression(ObjectExpression),
    ArrayExpression(ArrayExpression),
    CallExpression(CallExpression),
    ArrowFunctionExpression(ArrowFunctionExpression),
    ImportExpression(ImportExpression),
    MemberExpression(MemberExpression),
}

impl Expression {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Identifier(n) => n.kind(),
            Expression::StringLiteral(n) => n.kind(),
            Expression::NumericLiteral(n) => n.kind(),
            Expression::ObjectExpression(n) => n.kind(),
            Expression::ArrayExpression(n) => n.kind(),
            Expression::CallExpression(n) => n.kind(),
            Expression::ArrowFunctionExpression(n) => n.kind(),
            Expression::ImportExpression(n) => n.kind(),
            Expression::MemberExpression(n) => n.kind(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(n) => n.span,
            Expression::StringLiteral(n) => n.span,
            Expression::NumericLiteral(n) => n.span,
            Expression::ObjectExpression(n) => n.span,
            Expression::ArrayExpression(n) => n.span,
            Expression::CallExpression(n) => n.span,
            Expression::ArrowFunctionExpression(n) => n.span,
            Expression::ImportExpression(n) => n.span,
            Expression::MemberExpression(n) => n.span,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringLiteral> {
        match self {
            Expression::StringLiteral(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectExpression> {
        match self {
            Expression::ObjectExpression(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayExpression> {
        match self {
            Expression::ArrayExpression(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpression> {
        match self {
            Expression::CallExpression(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_arrow(&self) -> Option<&ArrowFunctionExpression> {
        match self {
            Expression::ArrowFunctionExpression(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub span: Span,
    pub name: String,
}

/// A string or template literal.
///
/// `value` is the literal exactly as written, quotes included; use
/// [`StringLiteral::unquoted`] to read its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    pub span: Span,
    pub value: String,
}

impl StringLiteral {
    /// The literal without its surrounding quote characters.
    pub fn unquoted(&self) -> &str {
        strip_quotes(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumericLiteral {
    pub span: Span,
    /// The literal as written (`0x1F`, `1_000`, `10n`, …).
    pub raw: String,
}

impl NumericLiteral {
    /// The literal's value, when it is a plain decimal or radix-prefixed
    /// number.
    pub fn value(&self) -> Option<f64> {
        let cleaned: String = self.raw.chars().filter(|c| *c != '_').collect();
        let cleaned = cleaned.trim_end_matches('n');
        let radix = match cleaned.get(..2) {
            Some("0x") | Some("0X") => Some(16),
            Some("0o") | Some("0O") => Some(8),
            Some("0b") | Some("0B") => Some(2),
            _ => None,
        };
        match radix {
            Some(radix) => u64::from_str_radix(&cleaned[2..], radix)
                .ok()
                .map(|v| v as f64),
            None => cleaned.parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpression {
    pub span: Span,
    pub id: NodeId,
    pub properties: Vec<ObjectProperty>,
}

impl ObjectExpression {
    /// Finds a property by its (unquoted) key name.
    pub fn property(&self, name: &str) -> Option<&ObjectProperty> {
        self.properties
            .iter()
            .find(|p| p.key_name() == Some(name))
    }
}

/// The key of a non-computed object property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
}

impl PropertyKey {
    pub fn span(&self) -> Span {
        match self {
            PropertyKey::Identifier(n) => n.span,
            PropertyKey::StringLiteral(n) => n.span,
        }
    }

    /// The key's name, with quotes stripped from string keys.
    pub fn name(&self) -> &str {
        match self {
            PropertyKey::Identifier(n) => &n.name,
            PropertyKey::StringLiteral(n) => n.unquoted(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectProperty {
    pub span: Span,
    pub key: PropertyKey,
    /// The value when it is of a modeled shape. Shorthand properties carry
    /// the key's identifier here; methods carry nothing.
    pub value: Option<Expression>,
    pub shorthand: bool,
    pub computed: bool,
    pub method: bool,
}

impl ObjectProperty {
    /// The key name usable for lookups, or `None` for computed keys.
    pub fn key_name(&self) -> Option<&str> {
        if self.computed {
            return None;
        }
        Some(self.key.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpression {
    pub span: Span,
    /// Elements of modeled shapes; unmodeled elements are omitted.
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    pub span: Span,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl CallExpression {
    /// Returns true for `import(…)`.
    pub fn is_dynamic_import(&self) -> bool {
        matches!(*self.callee, Expression::ImportExpression(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowFunctionExpression {
    pub span: Span,
    pub params: Vec<Identifier>,
    /// Present only for expression bodies of a modeled shape.
    pub body: Option<Box<Expression>>,
    pub is_async: bool,
}

/// The `import` keyword used as a callee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportExpression {
    pub span: Span,
}

/// `object.property`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpression {
    pub span: Span,
    pub object: Box<Expression>,
    pub property: Identifier,
    pub computed: bool,
}

impl MemberExpression {
    /// The dotted path of a chain of plain identifiers, e.g. `React.lazy`.
    pub fn dotted_name(&self) -> Option<String> {
        let object = match self.object.as_ref() {
            Expression::Identifier(id) => id.name.clone(),
            Expression::MemberExpression(inner) => inner.dotted_name()?,
            _ => return None,
        };
        Some(format!("{}.{}", object, self.property.name))
    }
}
