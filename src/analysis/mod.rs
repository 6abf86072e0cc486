//! Project-level analysis built on the parser.
//!
//! This module turns single-file ASTs into project facts:
//!
//! - [`parse_file`]: read and parse one source file
//! - [`ProjectScanner`]: per-file imports, file-to-file relations, import
//!   queries and transitive relations for everything under the scan path
//! - [`Resolver`]: maps an import source to the project file it names
//! - [`PageRoute`]: the route table declared by a router config file
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use jsxscope::analysis::ProjectScanner;
//! use jsxscope::config::ProjectConfig;
//!
//! let scanner = ProjectScanner::new(Path::new("./my-app"), ProjectConfig::default())?;
//! for relation in scanner.file_relations() {
//!     let count = relation.relation_files.len();
//!     println!("{} imports {} project files", relation.target_file.display(), count);
//! }
//!
//! for route in scanner.route_defines("src/routes/index.js")? {
//!     println!("{} -> {:?}", route.route_path, route.relative_file_path);
//! }
//! # Ok::<(), jsxscope::analysis::AnalysisError>(())
//! ```

pub mod project;
pub mod resolve;
pub mod routes;
pub mod source;

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::manifest::ManifestError;

pub use project::{FileImport, FileRelation, ImportQuery, ProjectScanner};
pub use resolve::{normalize, Resolver};
pub use routes::{extract_routes, PageRoute};
pub use source::{parse_file, read_source, SourceLanguage};

/// Errors that can occur during project analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A source file could not be read.
    #[error("Source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a project directory (missing src/): {0}")]
    InvalidProject(PathBuf),

    #[error("Scan path is not a directory: {0}")]
    ScanPath(PathBuf),

    #[error("Route file path is empty")]
    EmptyRouteFile,

    #[error("Route file does not exist: {0}")]
    RouteFileMissing(PathBuf),

    #[error("package.json has no dependencies")]
    NoDependencies,

    #[error("Project depends on neither react-router nor react-router-dom")]
    RouterMissing,

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
