//! Loading `package.json` files.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::PackageJson;

/// Errors that can occur while loading a `package.json`.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid JSON for a manifest.
    #[error("Failed to parse package.json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Reads and parses a `package.json` file.
///
/// # Arguments
///
/// * `path` - Path to the `package.json` file
///
/// # Returns
///
/// The parsed manifest, or [`ManifestError::Io`] naming the path.
pub fn parse_file(path: &Path) -> ManifestResult<PackageJson> {
    let content = read_file(path)?;
    parse_str(&content)
}

/// Reads a `package.json` file verbatim.
pub fn read_file(path: &Path) -> ManifestResult<String> {
    fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `package.json` content.
///
/// # Example
///
/// ```
/// use jsxscope::manifest::parse_str;
///
/// let pkg = parse_str(r#"{"name": "my-app", "version": "1.0.0"}"#).unwrap();
/// assert_eq!(pkg.name, Some("my-app".to_string()));
/// ```
pub fn parse_str(content: &str) -> ManifestResult<PackageJson> {
    let pkg: PackageJson = serde_json::from_str(content)?;
    Ok(pkg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_PACKAGE_JSON: &str = r#"{
        "name": "admin-console",
        "version": "0.3.0",
        "private": true,
        "scripts": { "dev": "vite" },
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
            "react-router-dom": "^6.22.0"
        },
        "devDependencies": {
            "typescript": "^5.0.0"
        }
    }"#;

    #[test]
    fn test_parse_str_valid() {
        let pkg = parse_str(SAMPLE_PACKAGE_JSON).unwrap();
        assert_eq!(pkg.name.as_deref(), Some("admin-console"));
        assert_eq!(pkg.version.as_deref(), Some("0.3.0"));
        assert_eq!(pkg.router_package(), Some("react-router-dom"));
    }

    #[test]
    fn test_parse_str_empty_object() {
        let pkg = parse_str("{}").unwrap();
        assert!(pkg.name.is_none());
        assert!(pkg.dependencies.is_none());
    }

    #[test]
    fn test_parse_str_invalid_json() {
        let result = parse_str("{ invalid json }");
        assert!(matches!(result.unwrap_err(), ManifestError::Json(_)));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_PACKAGE_JSON.as_bytes()).unwrap();
        let pkg = parse_file(file.path()).unwrap();
        assert!(pkg.depends_on("react-dom"));
        assert_eq!(
            pkg.dev_dependencies.unwrap().get("typescript").map(String::as_str),
            Some("^5.0.0")
        );
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
        assert!(err.to_string().contains("package.json"));
    }
}
