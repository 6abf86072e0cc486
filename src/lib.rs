//! JSXScope - Static import and object-literal analyzer for JavaScript/JSX projects
//!
//! This crate tokenizes and parses the parts of JavaScript and JSX modules
//! that matter for project structure (imports, `export default`, top-level
//! declarations and the object literals inside them) and builds project-level
//! reports on top: per-file imports, file relations and cycles, and the route
//! tables of react-router applications.
//!
//! # Example
//!
//! ```
//! use jsxscope::parser::Parser;
//! use jsxscope::visitor::ImportVisitor;
//!
//! let file = Parser::from_source("import React, { useState } from 'react';").parse(true);
//! let imports = ImportVisitor::collect(&file);
//! assert_eq!(imports[0].source_path, "react");
//! assert_eq!(imports[0].imported_names, vec!["React", "useState"]);
//! ```

pub mod analysis;
pub mod ast;
pub mod config;
pub mod export;
pub mod graph;
pub mod manifest;
pub mod parser;
pub mod tokenizer;
pub mod visitor;
