//! Project configuration.
//!
//! A [`ProjectConfig`] controls which files a project scan reads and how
//! import paths are resolved to files. Every field has a default, so a
//! config file only needs the fields it changes:
//!
//! ```json
//! { "languages": ["ts"], "scan_path": ["src", "pages"] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config enables no languages")]
    NoLanguages,
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Source language family of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Js,
    Ts,
}

impl Language {
    /// File extensions (without the dot) that belong to this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Js => &["jsx", "js", "mjs", "cjs"],
            Language::Ts => &["tsx", "ts", "mts", "cts"],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Js => write!(f, "js"),
            Language::Ts => write!(f, "ts"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "js" | "javascript" => Ok(Language::Js),
            "ts" | "typescript" => Ok(Language::Ts),
            _ => Err(format!("Unknown language: '{}'. Valid languages: js, ts", s)),
        }
    }
}

fn default_languages() -> Vec<Language> {
    vec![Language::Js, Language::Ts]
}

fn default_ignored_dirs() -> Vec<String> {
    ["node_modules", ".git", "dist", "build", ".next", "coverage", ".turbo"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Settings for scanning one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Languages whose files are scanned and probed during resolution.
    pub languages: Vec<Language>,

    /// Path segments, relative to the project root, of the directory to
    /// scan. Empty means `src`.
    pub scan_path: Vec<String>,

    /// Directory names skipped during a scan.
    pub ignored_dirs: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            scan_path: Vec::new(),
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

impl ProjectConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON config file
    ///
    /// # Returns
    ///
    /// The validated configuration, or an error naming what is wrong.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use jsxscope::config::{Language, ProjectConfig};
    ///
    /// let config = ProjectConfig::parse_str(r#"{"languages": ["ts"]}"#).unwrap();
    /// assert_eq!(config.languages, vec![Language::Ts]);
    /// assert!(config.is_ignored_dir("node_modules"));
    /// ```
    pub fn parse_str(content: &str) -> ConfigResult<Self> {
        let config: ProjectConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a scan.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        Ok(())
    }

    /// Returns a copy restricted to `languages`, keeping everything else.
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    /// Returns true if `ext` (without the dot) belongs to a configured
    /// language.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.languages
            .iter()
            .any(|language| language.extensions().contains(&ext.as_str()))
    }

    /// Extensions probed, in order, when an import omits one.
    ///
    /// TypeScript variants come before JavaScript ones when both languages
    /// are enabled; `.mjs` and `.cjs` are always tried last.
    ///
    /// ```
    /// use jsxscope::config::{Language, ProjectConfig};
    ///
    /// let config = ProjectConfig::default().with_languages(vec![Language::Js]);
    /// assert_eq!(config.resolution_extensions(), vec![".jsx", ".js", ".mjs", ".cjs"]);
    /// ```
    pub fn resolution_extensions(&self) -> Vec<&'static str> {
        let mut extensions = Vec::with_capacity(6);
        if self.has_language(Language::Ts) {
            extensions.extend([".tsx", ".ts"]);
        }
        if self.has_language(Language::Js) {
            extensions.extend([".jsx", ".js"]);
        }
        extensions.extend([".mjs", ".cjs"]);
        extensions
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|dir| dir == name)
    }

    /// Directory to scan under `root`.
    pub fn scan_root(&self, root: &Path) -> PathBuf {
        if self.scan_path.is_empty() {
            return root.join("src");
        }
        self.scan_path
            .iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}
