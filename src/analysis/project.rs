//! Project scanning.
//!
//! [`ProjectScanner`] walks the scan path, parses every source file in
//! import-only mode and derives import facts from the collected
//! [`ImportRecord`]s.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::graph::FileGraph;
use crate::manifest::{self, PackageJson};
use crate::visitor::{ImportRecord, ImportVisitor};

use super::resolve::{normalize, Resolver};
use super::source::parse_file;
use super::{AnalysisError, AnalysisResult};

/// The import records of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileImport {
    pub file: PathBuf,
    pub imports: Vec<ImportRecord>,
}

/// What one file imports, both as project files and as raw sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRelation {
    pub target_file: PathBuf,
    /// Project files imported by the target, in import order, without
    /// duplicates.
    pub relation_files: Vec<PathBuf>,
    /// Every import source mapped to the names imported from it. Repeated
    /// sources accumulate their names.
    pub import_map: BTreeMap<String, Vec<String>>,
}

/// A set of (source, names) pairs to search a project for.
///
/// A source with names matches files importing at least one of them; a
/// source without names matches any import of it.
///
/// # Example
///
/// ```
/// use jsxscope::analysis::ImportQuery;
///
/// let query = ImportQuery::new()
///     .names("react", ["useState", "useReducer"])
///     .any("./api");
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportQuery {
    sources: BTreeMap<String, Option<Vec<String>>>,
}

impl ImportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches files importing any of `names` from `source`.
    pub fn names<I, S>(mut self, source: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        self.sources.insert(source.into(), Some(names));
        self
    }

    /// Matches files importing anything from `source`.
    pub fn any(mut self, source: impl Into<String>) -> Self {
        self.sources.insert(source.into(), None);
        self
    }

    pub fn insert(&mut self, source: impl Into<String>, names: Option<Vec<String>>) {
        self.sources.insert(source.into(), names);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn matches(&self, relation: &FileRelation) -> bool {
        relation.import_map.iter().any(|(source, imported)| {
            match self.sources.get(source) {
                None => false,
                Some(None) => true,
                Some(Some(wanted)) => imported.iter().any(|name| wanted.contains(name)),
            }
        })
    }
}

/// Import analysis over one project directory.
///
/// A project is a directory with a `src/` subdirectory. Only files under
/// the configured scan path whose extension belongs to a configured
/// language are read; ignored directories are not entered.
#[derive(Debug, Clone)]
pub struct ProjectScanner {
    root: PathBuf,
    scan_root: PathBuf,
    config: ProjectConfig,
    resolver: Resolver,
}

impl ProjectScanner {
    /// Opens a project.
    ///
    /// # Arguments
    ///
    /// * `root` - Project root directory (the one holding `src/`)
    /// * `config` - Languages, scan path and ignored directories
    ///
    /// # Returns
    ///
    /// The scanner, or [`AnalysisError::InvalidProject`] when `src/` is
    /// missing and [`AnalysisError::ScanPath`] when the scan path is not a
    /// directory.
    pub fn new(root: &Path, config: ProjectConfig) -> AnalysisResult<Self> {
        config.validate()?;

        let root = normalize(root);
        if !root.join("src").is_dir() {
            return Err(AnalysisError::InvalidProject(root));
        }

        let scan_root = normalize(&config.scan_root(&root));
        if !scan_root.is_dir() {
            return Err(AnalysisError::ScanPath(scan_root));
        }

        debug!(
            root = %root.display(),
            scan_root = %scan_root.display(),
            languages = ?config.languages,
            "opened project"
        );

        Ok(Self {
            resolver: Resolver::new(&root, &config),
            root,
            scan_root,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scan_root(&self) -> &Path {
        &self.scan_root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Source files under the scan path, in directory-walk order with
    /// entries sorted by name.
    pub fn source_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.scan_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_ignored_dir(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| self.config.accepts_extension(ext))
            })
            .map(|e| e.into_path())
            .collect()
    }

    fn is_ignored_dir(&self, entry: &walkdir::DirEntry) -> bool {
        entry.file_type().is_dir()
            && self
                .config
                .is_ignored_dir(entry.file_name().to_string_lossy().as_ref())
    }

    /// Parses every source file in parallel and maps its import records
    /// with `build`. Unreadable files are logged and left out.
    fn scan<T, F>(&self, build: F) -> Vec<T>
    where
        T: Send,
        F: Fn(PathBuf, Vec<ImportRecord>) -> T + Sync,
    {
        let files = self.source_files();
        debug!(files = files.len(), "scanning project");

        files
            .into_par_iter()
            .filter_map(|path| match parse_file(&path, true) {
                Ok(file) => {
                    let records = ImportVisitor::collect(&file);
                    Some(build(path, records))
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping file");
                    None
                }
            })
            .collect()
    }

    /// The import records of every source file.
    pub fn file_imports(&self) -> Vec<FileImport> {
        self.scan(|file, imports| FileImport { file, imports })
    }

    /// The project files each source file imports.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use jsxscope::analysis::ProjectScanner;
    /// use jsxscope::config::ProjectConfig;
    ///
    /// let scanner = ProjectScanner::new(Path::new("."), ProjectConfig::default())?;
    /// for relation in scanner.file_relations() {
    ///     for imported in &relation.relation_files {
    ///         println!("{} -> {}", relation.target_file.display(), imported.display());
    ///     }
    /// }
    /// # Ok::<(), jsxscope::analysis::AnalysisError>(())
    /// ```
    pub fn file_relations(&self) -> Vec<FileRelation> {
        self.scan(|path, records| self.relation_of(path, records))
    }

    fn relation_of(&self, target_file: PathBuf, records: Vec<ImportRecord>) -> FileRelation {
        let mut relation_files = Vec::new();
        let mut import_map: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for record in records {
            if self.resolver.is_project_import(&record.source_path) {
                match self.resolver.resolve_import(&target_file, &record.source_path) {
                    Some(file) if !relation_files.contains(&file) => relation_files.push(file),
                    Some(_) => {}
                    None => trace!(
                        file = %target_file.display(),
                        source = %record.source_path,
                        "unresolved project import"
                    ),
                }
            }
            import_map
                .entry(record.source_path)
                .or_default()
                .extend(record.imported_names);
        }

        FileRelation {
            target_file,
            relation_files,
            import_map,
        }
    }

    /// Files whose imports match `query`, in scan order.
    pub fn find_files_with_import(&self, query: &ImportQuery) -> Vec<PathBuf> {
        if query.is_empty() {
            return Vec::new();
        }
        self.file_relations()
            .into_iter()
            .filter(|relation| query.matches(relation))
            .map(|relation| relation.target_file)
            .collect()
    }

    /// Expands relations into one entry per root file (a file no other file
    /// imports) listing everything it reaches, depth-first.
    ///
    /// Files only reachable through a cycle with no outside importer have
    /// no root and are left out.
    pub fn deep_relations(relations: &[FileRelation]) -> Vec<FileRelation> {
        let graph = FileGraph::from_relations(relations);
        let by_target: HashMap<&Path, &FileRelation> = relations
            .iter()
            .map(|r| (r.target_file.as_path(), r))
            .collect();

        graph
            .roots()
            .into_iter()
            .filter_map(|root| {
                let relation = by_target.get(root)?;
                Some(FileRelation {
                    target_file: root.to_path_buf(),
                    relation_files: graph
                        .reachable_from(root)
                        .into_iter()
                        .map(Path::to_path_buf)
                        .collect(),
                    import_map: relation.import_map.clone(),
                })
            })
            .collect()
    }

    fn package_json_path(&self) -> PathBuf {
        self.root.join("package.json")
    }

    /// The project's `package.json`, parsed.
    pub fn package_json(&self) -> AnalysisResult<PackageJson> {
        Ok(manifest::parse_file(&self.package_json_path())?)
    }

    /// The project's `package.json`, verbatim.
    pub fn package_json_string(&self) -> AnalysisResult<String> {
        Ok(manifest::read_file(&self.package_json_path())?)
    }

    /// Returns the router package the project depends on.
    ///
    /// Fails with [`AnalysisError::NoDependencies`] when `package.json`
    /// declares no runtime dependencies and [`AnalysisError::RouterMissing`]
    /// when none of them is a router.
    pub fn require_router(&self) -> AnalysisResult<&'static str> {
        let pkg = self.package_json()?;
        if pkg.dependencies.is_none() {
            return Err(AnalysisError::NoDependencies);
        }
        pkg.router_package().ok_or(AnalysisError::RouterMissing)
    }
}
