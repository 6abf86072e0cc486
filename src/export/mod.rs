//! Export functionality for analysis results.
//!
//! This module renders an [`ExportData`] report as JSON (machine-readable)
//! or Markdown (for documentation and review). A report holds whichever
//! sections a command produced; empty sections are left out of both
//! formats.

pub mod json;
pub mod markdown;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::analysis::{FileImport, FileRelation, PageRoute, Resolver};
use crate::graph::CycleInfo;
use crate::visitor::ObjectRecord;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    #[default]
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// An object literal flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Dotted context path, `None` for anonymous objects.
    pub path: Option<String>,
    /// Property key names; computed keys are left out.
    pub keys: Vec<String>,
    pub line: usize,
    pub column: usize,
}

impl From<&ObjectRecord<'_>> for ObjectSummary {
    fn from(record: &ObjectRecord<'_>) -> Self {
        let start = record.expression.span.start;
        Self {
            path: record.path.clone(),
            keys: record
                .expression
                .properties
                .iter()
                .filter_map(|p| p.key_name())
                .map(String::from)
                .collect(),
            line: start.line,
            column: start.column,
        }
    }
}

/// Data container for export operations.
///
/// Paths are rendered relative to `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct ExportData {
    /// Project or file name shown in the report header
    pub project_name: String,
    pub root: Option<PathBuf>,
    pub file_imports: Vec<FileImport>,
    pub relations: Vec<FileRelation>,
    /// True when `relations` are transitive (one entry per root file)
    pub deep: bool,
    pub cycles: Vec<CycleInfo>,
    /// Files found by an import query
    pub matches: Vec<PathBuf>,
    pub routes: Vec<PageRoute>,
    pub objects: Vec<ObjectSummary>,
}

impl ExportData {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root: &Path) -> Self {
        self.root = Some(root.to_path_buf());
        self
    }

    pub fn with_imports(mut self, file_imports: Vec<FileImport>) -> Self {
        self.file_imports = file_imports;
        self
    }

    pub fn with_relations(mut self, relations: Vec<FileRelation>, deep: bool) -> Self {
        self.relations = relations;
        self.deep = deep;
        self
    }

    pub fn with_cycles(mut self, cycles: Vec<CycleInfo>) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_matches(mut self, matches: Vec<PathBuf>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_routes(mut self, routes: Vec<PageRoute>) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_objects(mut self, records: &[ObjectRecord<'_>]) -> Self {
        self.objects = records.iter().map(ObjectSummary::from).collect();
        self
    }

    /// `path` relative to the report root, `/`-separated.
    pub fn display_path(&self, path: &Path) -> String {
        match &self.root {
            Some(root) => Resolver::relative_to(root, path),
            None => path.to_string_lossy().replace('\\', "/"),
        }
    }

    /// Total import declarations across `file_imports`.
    pub fn import_count(&self) -> usize {
        self.file_imports.iter().map(|f| f.imports.len()).sum()
    }

    /// Total project-file edges across `relations`.
    pub fn relation_count(&self) -> usize {
        self.relations.iter().map(|r| r.relation_files.len()).sum()
    }

    /// Routes whose component file is missing on disk.
    pub fn missing_component_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|r| r.component_file.is_some() && !r.component_file_exists)
            .count()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::visitor::ObjectVisitor;
    use std::collections::BTreeMap;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_object_summary() {
        let file =
            Parser::from_source("const r = {\n  path: '/',\n  ['k']: 1,\n  lazy() {}\n};")
                .parse(false);
        let records = ObjectVisitor::collect(&file);
        let data = ExportData::new("r.js").with_objects(&records);
        assert_eq!(
            data.objects,
            vec![ObjectSummary {
                path: Some("r".to_string()),
                keys: vec!["path".to_string(), "lazy".to_string()],
                line: 1,
                column: 10,
            }]
        );
    }

    #[test]
    fn test_counts_and_paths() {
        let data = ExportData::new("app")
            .with_root(Path::new("/work/app"))
            .with_relations(
                vec![FileRelation {
                    target_file: PathBuf::from("/work/app/src/main.jsx"),
                    relation_files: vec![PathBuf::from("/work/app/src/App.jsx")],
                    import_map: BTreeMap::new(),
                }],
                false,
            );
        assert_eq!(data.relation_count(), 1);
        assert_eq!(data.import_count(), 0);
        assert_eq!(
            data.display_path(Path::new("/work/app/src/main.jsx")),
            "src/main.jsx"
        );
        assert_eq!(
            ExportData::new("x").display_path(Path::new("a/b.js")),
            "a/b.js"
        );
    }
}
