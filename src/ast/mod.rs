//! Abstract syntax tree for the modeled JavaScript/JSX subset.
//!
//! The tree covers what import/export and object-literal analysis needs:
//! import declarations, `export default`, variable declarations, and the
//! expression shapes that appear in their initializers (literals,
//! identifiers, objects, arrays, calls, member accesses and expression-bodied
//! arrow functions). Everything else is skipped by the parser.
//!
//! # Example
//!
//! ```
//! use jsxscope::ast::{Expression, Statement};
//! use jsxscope::parser::Parser;
//!
//! let file = Parser::from_source("const port = 8080;").parse(false);
//! let Statement::VariableDeclaration(decl) = &file.program.body[0] else {
//!     panic!("expected a variable declaration");
//! };
//! assert_eq!(decl.declarations[0].id.name, "port");
//! assert!(matches!(decl.declarations[0].init, Some(Expression::NumericLiteral(_))));
//! ```

pub mod node;
pub mod span;

pub use node::{
    ArrayExpression, ArrowFunctionExpression, CallExpression, ExportDefaultDeclaration,
    Expression, File, Identifier, ImportDeclaration, ImportExpression, ImportSpecifier,
    MemberExpression, NodeId, NodeKind, NumericLiteral, ObjectExpression, ObjectProperty,
    Program, PropertyKey, SourceType, SpecifierKind, Spanned, Statement, StringLiteral,
    VariableDeclaration, VariableDeclarator, VariableKind,
};
pub use span::{Position, Span};
