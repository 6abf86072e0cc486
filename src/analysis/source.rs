//! Reading and parsing source files.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::ast::File;
use crate::config::Language;
use crate::parser::Parser;

use super::{AnalysisError, AnalysisResult};

/// Dialect of a source file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// The configurable language family this dialect belongs to.
    pub fn language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => Language::Js,
            SourceLanguage::TypeScript | SourceLanguage::Tsx => Language::Ts,
        }
    }
}

/// Reads a source file as UTF-8.
pub fn read_source(path: &Path) -> AnalysisResult<String> {
    fs::read_to_string(path).map_err(|source| AnalysisError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses one file.
///
/// Parsing never fails; only reading can.
///
/// # Arguments
///
/// * `path` - File to parse
/// * `import_only` - Stop at the first statement that is not an import
///
/// # Returns
///
/// The file's AST, or [`AnalysisError::SourceUnavailable`].
pub fn parse_file(path: &Path, import_only: bool) -> AnalysisResult<File> {
    let content = read_source(path)?;
    let file = Parser::from_source(&content).parse(import_only);
    debug!(
        path = %path.display(),
        statements = file.program.body.len(),
        "parsed file"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_extension() {
        assert_eq!(SourceLanguage::from_extension("js"), Some(SourceLanguage::JavaScript));
        assert_eq!(SourceLanguage::from_extension("CJS"), Some(SourceLanguage::JavaScript));
        assert_eq!(SourceLanguage::from_extension("jsx"), Some(SourceLanguage::Jsx));
        assert_eq!(SourceLanguage::from_extension("mts"), Some(SourceLanguage::TypeScript));
        assert_eq!(SourceLanguage::from_extension("tsx"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("css"), None);
    }

    #[test]
    fn test_from_path_and_language() {
        let lang = SourceLanguage::from_path(Path::new("src/App.tsx")).unwrap();
        assert_eq!(lang.language(), Language::Ts);
        assert_eq!(
            SourceLanguage::from_path(Path::new("src/main.jsx")).map(|l| l.language()),
            Some(Language::Js)
        );
        assert_eq!(SourceLanguage::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::Builder::new().suffix(".jsx").tempfile().unwrap();
        file.write_all(b"import React from 'react';\nconst App = () => null;\nexport default App;")
            .unwrap();

        let full = parse_file(file.path(), false).unwrap();
        assert_eq!(full.program.body.len(), 3);

        let imports = parse_file(file.path(), true).unwrap();
        assert_eq!(imports.program.body.len(), 1);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(&dir.path().join("gone.js"), false).unwrap_err();
        assert!(matches!(err, AnalysisError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("gone.js"));
    }
}
