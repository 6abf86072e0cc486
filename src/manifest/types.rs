//! Shared types for `package.json` handling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Packages whose presence marks a project as using client-side routing.
pub const ROUTER_PACKAGES: [&str; 2] = ["react-router", "react-router-dom"];

/// The parts of a `package.json` file the analysis reads.
///
/// Unknown fields are ignored. Dependency tables keep their keys sorted so
/// reports come out in a stable order.
///
/// # Example
///
/// ```
/// use jsxscope::manifest::PackageJson;
///
/// let json = r#"{"name": "admin", "dependencies": {"react-router-dom": "^6.22.0"}}"#;
/// let pkg: PackageJson = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.router_package(), Some("react-router-dom"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageJson {
    pub name: Option<String>,

    pub version: Option<String>,

    /// Runtime dependencies.
    pub dependencies: Option<BTreeMap<String, String>>,

    /// Build-time dependencies; never consulted for routing.
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

impl PackageJson {
    /// Returns true if `name` is a runtime dependency.
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies
            .as_ref()
            .is_some_and(|deps| deps.contains_key(name))
    }

    /// Returns the first router package listed in `dependencies`, if any.
    ///
    /// Only runtime dependencies count; a router that is merely a dev
    /// dependency does not route anything.
    pub fn router_package(&self) -> Option<&'static str> {
        ROUTER_PACKAGES.into_iter().find(|name| self.depends_on(name))
    }
}
