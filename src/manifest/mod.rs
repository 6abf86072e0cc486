//! `package.json` support.
//!
//! The project analysis reads the manifest for one decision: whether the
//! project routes with `react-router` or `react-router-dom`. The manifest
//! is also exposed as-is for reporting.
//!
//! # Example
//!
//! ```
//! use jsxscope::manifest::parse_str;
//!
//! let pkg = parse_str(r#"{"dependencies": {"react-router": "^6.0.0"}}"#).unwrap();
//! assert_eq!(pkg.router_package(), Some("react-router"));
//! assert!(pkg.depends_on("react-router"));
//! ```

pub mod package_json;
pub mod types;

pub use package_json::{parse_file, parse_str, read_file, ManifestError, ManifestResult};

pub use types::{PackageJson, ROUTER_PACKAGES};
