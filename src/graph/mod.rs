//! Graph module for file relationship modeling.
//!
//! This module provides [`FileGraph`], a directed graph of which project
//! file imports which, used for root detection, transitive relations and
//! cycle reporting.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use jsxscope::graph::FileGraph;
//!
//! let mut graph = FileGraph::new();
//! graph.add_import(Path::new("src/a.js"), Path::new("src/b.js"));
//! graph.add_import(Path::new("src/b.js"), Path::new("src/a.js"));
//!
//! assert!(graph.has_cycles());
//! assert_eq!(graph.cycles()[0].cycle_path(), "src/a.js -> src/b.js -> src/a.js");
//! ```

mod file_graph;

pub use file_graph::{CycleInfo, FileGraph};
