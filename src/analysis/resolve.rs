//! Import-path resolution.
//!
//! Maps the source string of an import to the project file it names. The
//! accepted forms are:
//!
//! | Source | Base directory |
//! |---|---|
//! | `./x`, `../x` | directory of the importing file |
//! | `/x`, `src/x` | project root |
//! | `@/x`, `$src/x`, `@x` | `src/` |
//! | anything else | `src/` (route components only) |
//!
//! A base path is then probed as an exact file, with each configured
//! extension appended, and finally as a directory with an `index` file.

use std::path::{Component, Path, PathBuf};

use crate::config::ProjectConfig;

/// Imports of these kinds are project files even without a path prefix.
const STYLE_SUFFIXES: [&str; 3] = [".css", ".less", ".scss"];

/// Resolves import sources against one project layout.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    src_dir: PathBuf,
    extensions: Vec<&'static str>,
}

impl Resolver {
    pub fn new(root: &Path, config: &ProjectConfig) -> Self {
        let root = normalize(root);
        Self {
            src_dir: root.join("src"),
            root,
            extensions: config.resolution_extensions(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Returns true if `source` names a file of this project rather than a
    /// package.
    ///
    /// Path-like sources and style sheets always count. `@` and `$src`
    /// sources are ambiguous with scoped packages, so they count only when
    /// they resolve to an existing file under `src/`.
    pub fn is_project_import(&self, source: &str) -> bool {
        if source.starts_with('@') || source.starts_with("$src") {
            return self
                .base_path(&self.src_dir, source)
                .and_then(|base| self.probe(&base))
                .is_some();
        }
        source.starts_with("./")
            || source.starts_with("../")
            || source.starts_with('/')
            || source.starts_with("src/")
            || STYLE_SUFFIXES.iter().any(|suffix| source.ends_with(suffix))
    }

    /// Resolves `source`, imported from `from_file`, to an existing file.
    ///
    /// # Arguments
    ///
    /// * `from_file` - The file containing the import
    /// * `source` - The import source with quotes removed
    ///
    /// # Returns
    ///
    /// The normalized path of the imported file, or `None` if no candidate
    /// exists on disk.
    pub fn resolve_import(&self, from_file: &Path, source: &str) -> Option<PathBuf> {
        let base = self.base_path(from_file, source)?;
        self.probe(&base)
    }

    /// Resolves a route component import, falling back to the path the
    /// import most likely means when nothing exists on disk.
    ///
    /// The fallback is the base path itself when `source` already carries a
    /// known extension, and `<base>/index<first extension>` otherwise.
    pub fn resolve_component(&self, from_file: &Path, source: &str) -> Option<PathBuf> {
        if let Some(found) = self.resolve_import(from_file, source) {
            return Some(found);
        }
        let base = self.base_path(from_file, source)?;
        if self.extensions.iter().any(|ext| source.ends_with(ext)) {
            return Some(base);
        }
        let first = self.extensions.first()?;
        Some(base.join(format!("index{}", first)))
    }

    /// `path` relative to the project root, with `/` separators.
    pub fn relative_path(&self, path: &Path) -> String {
        Self::relative_to(&self.root, path)
    }

    /// `path` relative to `root` when it lies under it, `/`-separated.
    pub fn relative_to(root: &Path, path: &Path) -> String {
        let root = normalize(root);
        let path = normalize(path);
        let relative = path.strip_prefix(&root).unwrap_or(&path);
        relative.to_string_lossy().replace('\\', "/")
    }

    fn base_path(&self, from_file: &Path, source: &str) -> Option<PathBuf> {
        if source.is_empty() {
            return None;
        }

        let base = if source.starts_with("./") || source.starts_with("../") {
            match from_file.parent() {
                Some(dir) => dir.join(source),
                None => PathBuf::from(source),
            }
        } else if let Some(rest) = source.strip_prefix('/') {
            self.root.join(rest)
        } else if source.starts_with("src/") {
            self.root.join(source)
        } else if let Some(rest) = source.strip_prefix("@/") {
            self.src_dir.join(rest)
        } else if let Some(rest) = source.strip_prefix("$src/") {
            self.src_dir.join(rest)
        } else if let Some(rest) = source.strip_prefix('@') {
            self.src_dir.join(rest.trim_start_matches('/'))
        } else {
            self.src_dir.join(source)
        };
        Some(normalize(&base))
    }

    /// Exact file, then `<base><ext>`, then `<base>/index<ext>`.
    fn probe(&self, base: &Path) -> Option<PathBuf> {
        if base.is_file() {
            return Some(base.to_path_buf());
        }
        for ext in &self.extensions {
            let candidate = with_suffix(base, ext);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if base.is_dir() {
            return self.index_file(base);
        }
        None
    }

    fn index_file(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| dir.join(format!("index{}", ext)))
            .find(|candidate| candidate.is_file())
    }
}

/// Appends `suffix` to the last path component (`Card` + `.jsx`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Removes `.` components and folds `..` into its parent, without touching
/// the filesystem.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use jsxscope::analysis::normalize;
///
/// assert_eq!(
///     normalize(Path::new("/app/src/pages/../components/./Card")),
///     PathBuf::from("/app/src/components/Card")
/// );
/// assert_eq!(normalize(Path::new("../lib")), PathBuf::from("../lib"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;
    use std::fs;
    use tempfile::TempDir;

    /// Creates `files` (relative paths) under a fresh project root.
    fn project(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        dir
    }

    fn resolver(dir: &TempDir) -> Resolver {
        Resolver::new(dir.path(), &ProjectConfig::default())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../../a")), PathBuf::from("../../a"));
    }

    #[test]
    fn test_relative_imports() {
        let dir = project(&[
            "src/pages/Home.jsx",
            "src/components/Card/index.tsx",
            "src/utils.js",
            "src/pages/home.module.css",
        ]);
        let r = resolver(&dir);
        let home = r.root().join("src/pages/Home.jsx");

        assert_eq!(
            r.resolve_import(&home, "../components/Card"),
            Some(r.root().join("src/components/Card/index.tsx"))
        );
        assert_eq!(
            r.resolve_import(&home, "../utils"),
            Some(r.root().join("src/utils.js"))
        );
        assert_eq!(
            r.resolve_import(&home, "./home.module.css"),
            Some(r.root().join("src/pages/home.module.css"))
        );
        assert_eq!(r.resolve_import(&home, "./Missing"), None);
    }

    #[test]
    fn test_alias_imports() {
        let dir = project(&["src/components/Card.jsx", "src/hooks/index.js"]);
        let r = resolver(&dir);
        let from = r.root().join("src/App.jsx");
        let card = Some(r.root().join("src/components/Card.jsx"));

        assert_eq!(r.resolve_import(&from, "@/components/Card"), card);
        assert_eq!(r.resolve_import(&from, "$src/components/Card"), card);
        assert_eq!(r.resolve_import(&from, "@components/Card"), card);
        assert_eq!(r.resolve_import(&from, "src/components/Card"), card);
        assert_eq!(r.resolve_import(&from, "/src/components/Card"), card);
        assert_eq!(
            r.resolve_import(&from, "@/hooks"),
            Some(r.root().join("src/hooks/index.js"))
        );
    }

    #[test]
    fn test_extension_order_follows_languages() {
        let dir = project(&["src/App.tsx", "src/App.jsx"]);
        let from = dir.path().join("src/main.js");

        let both = resolver(&dir);
        assert_eq!(both.resolve_import(&from, "./App"), Some(both.root().join("src/App.tsx")));

        let js_only = Resolver::new(
            dir.path(),
            &ProjectConfig::default().with_languages(vec![Language::Js]),
        );
        assert_eq!(
            js_only.resolve_import(&from, "./App"),
            Some(js_only.root().join("src/App.jsx"))
        );
    }

    #[test]
    fn test_is_project_import() {
        let dir = project(&["src/components/Card.jsx"]);
        let r = resolver(&dir);

        assert!(r.is_project_import("./App"));
        assert!(r.is_project_import("../lib/api"));
        assert!(r.is_project_import("/src/index"));
        assert!(r.is_project_import("src/index"));
        assert!(r.is_project_import("antd/dist/reset.css"));
        assert!(r.is_project_import("@/components/Card"));
        assert!(!r.is_project_import("@mui/material"));
        assert!(!r.is_project_import("@/components/Missing"));
        assert!(!r.is_project_import("react"));
        assert!(!r.is_project_import("$srcfoo"));
    }

    #[test]
    fn test_resolve_component_fallbacks() {
        let dir = project(&["src/pages/Home.jsx"]);
        let r = resolver(&dir);
        let routes = r.root().join("src/routes.js");

        assert_eq!(
            r.resolve_component(&routes, "./pages/Home"),
            Some(r.root().join("src/pages/Home.jsx"))
        );
        assert_eq!(
            r.resolve_component(&routes, "./pages/About.jsx"),
            Some(r.root().join("src/pages/About.jsx"))
        );
        assert_eq!(
            r.resolve_component(&routes, "./pages/About"),
            Some(r.root().join("src/pages/About/index.tsx"))
        );
        assert_eq!(
            r.resolve_component(&routes, "pages/Home"),
            Some(r.root().join("src/pages/Home.jsx"))
        );
        assert_eq!(r.resolve_component(&routes, ""), None);
    }

    #[test]
    fn test_relative_path() {
        let dir = project(&[]);
        let r = resolver(&dir);
        assert_eq!(
            r.relative_path(&r.root().join("src/pages/../App.jsx")),
            "src/App.jsx"
        );
        assert_eq!(r.relative_path(Path::new("/elsewhere/x.js")), "/elsewhere/x.js");
    }
}
