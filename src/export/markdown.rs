//! Markdown export implementation.
//!
//! Exports analysis results in Markdown format for documentation and review.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

/// Escapes characters that would break a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Import Analysis Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Project:** {}", data.project_name)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        if !data.file_imports.is_empty() {
            writeln!(writer, "| Files | {} |", data.file_imports.len())?;
            writeln!(writer, "| Import Declarations | {} |", data.import_count())?;
        }
        if !data.relations.is_empty() {
            let label = if data.deep { "Root Files" } else { "Files" };
            writeln!(writer, "| {} | {} |", label, data.relations.len())?;
            writeln!(writer, "| Project Imports | {} |", data.relation_count())?;
            writeln!(writer, "| Import Cycles | {} |", data.cycles.len())?;
        }
        if !data.matches.is_empty() {
            writeln!(writer, "| Matching Files | {} |", data.matches.len())?;
        }
        if !data.routes.is_empty() {
            writeln!(writer, "| Routes | {} |", data.routes.len())?;
            writeln!(
                writer,
                "| Missing Components | {} |",
                data.missing_component_count()
            )?;
        }
        if !data.objects.is_empty() {
            writeln!(writer, "| Object Literals | {} |", data.objects.len())?;
        }
        writeln!(writer)?;

        // Imports per file
        if !data.file_imports.is_empty() {
            writeln!(writer, "## Imports")?;
            writeln!(writer)?;
            for file in &data.file_imports {
                writeln!(writer, "### `{}`", data.display_path(&file.file))?;
                writeln!(writer)?;
                if file.imports.is_empty() {
                    writeln!(writer, "_No imports._")?;
                    writeln!(writer)?;
                    continue;
                }
                writeln!(writer, "| Source | Names |")?;
                writeln!(writer, "|--------|-------|")?;
                for record in &file.imports {
                    writeln!(
                        writer,
                        "| {} | {} |",
                        cell(&record.source_path),
                        cell(&record.imported_names.join(", "))
                    )?;
                }
                writeln!(writer)?;
            }
        }

        // File relations
        if !data.relations.is_empty() {
            let heading = if data.deep {
                "Transitive Relations"
            } else {
                "File Relations"
            };
            writeln!(writer, "## {}", heading)?;
            writeln!(writer)?;
            for relation in &data.relations {
                writeln!(
                    writer,
                    "- `{}` ({})",
                    data.display_path(&relation.target_file),
                    relation.relation_files.len()
                )?;
                for imported in &relation.relation_files {
                    writeln!(writer, "  - `{}`", data.display_path(imported))?;
                }
            }
            writeln!(writer)?;
        }

        // Import cycles
        if !data.cycles.is_empty() {
            writeln!(writer, "## Issues")?;
            writeln!(writer)?;
            writeln!(writer, "### Import Cycles")?;
            writeln!(writer)?;
            writeln!(writer, "The following import cycles were detected:")?;
            writeln!(writer)?;
            for (i, cycle) in data.cycles.iter().enumerate() {
                let mut files: Vec<String> =
                    cycle.files.iter().map(|f| data.display_path(f)).collect();
                files.extend(files.first().cloned());
                writeln!(writer, "{}. `{}`", i + 1, files.join(" -> "))?;
            }
            writeln!(writer)?;
        }

        // Query matches
        if !data.matches.is_empty() {
            writeln!(writer, "## Matching Files")?;
            writeln!(writer)?;
            for file in &data.matches {
                writeln!(writer, "- `{}`", data.display_path(file))?;
            }
            writeln!(writer)?;
        }

        // Routes
        if !data.routes.is_empty() {
            writeln!(writer, "## Routes")?;
            writeln!(writer)?;
            writeln!(writer, "| Path | Title | Component | Exists |")?;
            writeln!(writer, "|------|-------|-----------|--------|")?;
            for route in &data.routes {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    cell(&route.route_path),
                    cell(&route.title),
                    route
                        .relative_file_path
                        .as_deref()
                        .map(cell)
                        .unwrap_or_else(|| "-".to_string()),
                    if route.component_file_exists { "yes" } else { "no" }
                )?;
            }
            writeln!(writer)?;
        }

        // Object literals
        if !data.objects.is_empty() {
            writeln!(writer, "## Object Literals")?;
            writeln!(writer)?;
            writeln!(writer, "| Path | Keys | Line |")?;
            writeln!(writer, "|------|------|------|")?;
            for object in &data.objects {
                writeln!(
                    writer,
                    "| {} | {} | {}:{} |",
                    cell(object.path.as_deref().unwrap_or("<anonymous>")),
                    cell(&object.keys.join(", ")),
                    object.line,
                    object.column
                )?;
            }
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by jsxscope*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FileImport, FileRelation, PageRoute};
    use crate::export::ObjectSummary;
    use crate::graph::CycleInfo;
    use crate::visitor::ImportRecord;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    fn render(data: &ExportData) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_header() {
        let md = render(&ExportData::new("shop"));
        assert!(md.contains("# Import Analysis Report"));
        assert!(md.contains("**Project:** shop"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("*Generated by jsxscope*"));
        assert!(!md.contains("## Routes"));
    }

    #[test]
    fn test_markdown_export_imports() {
        let data = ExportData::new("shop")
            .with_root(Path::new("/w"))
            .with_imports(vec![
                FileImport {
                    file: PathBuf::from("/w/src/main.jsx"),
                    imports: vec![ImportRecord {
                        source_path: "react".to_string(),
                        imported_names: vec!["useState".to_string(), "useMemo".to_string()],
                    }],
                },
                FileImport {
                    file: PathBuf::from("/w/src/api.js"),
                    imports: Vec::new(),
                },
            ]);
        let md = render(&data);
        assert!(md.contains("| Import Declarations | 1 |"));
        assert!(md.contains("### `src/main.jsx`"));
        assert!(md.contains("| react | useState, useMemo |"));
        assert!(md.contains("_No imports._"));
    }

    #[test]
    fn test_markdown_export_relations_and_cycles() {
        let data = ExportData::new("p")
            .with_root(Path::new("/p"))
            .with_relations(
                vec![FileRelation {
                    target_file: PathBuf::from("/p/src/a.js"),
                    relation_files: vec![PathBuf::from("/p/src/b.js")],
                    import_map: BTreeMap::new(),
                }],
                false,
            )
            .with_cycles(vec![CycleInfo {
                files: vec![PathBuf::from("/p/src/a.js"), PathBuf::from("/p/src/b.js")],
            }]);
        let md = render(&data);
        assert!(md.contains("## File Relations"));
        assert!(md.contains("- `src/a.js` (1)"));
        assert!(md.contains("  - `src/b.js`"));
        assert!(md.contains("1. `src/a.js -> src/b.js -> src/a.js`"));
    }

    #[test]
    fn test_markdown_export_routes_and_objects() {
        let data = ExportData {
            project_name: "p".to_string(),
            routes: vec![PageRoute {
                route_path: "/a|b".to_string(),
                title: String::new(),
                component_file: None,
                relative_file_path: None,
                component_file_exists: false,
            }],
            objects: vec![ObjectSummary {
                path: None,
                keys: vec!["x".to_string()],
                line: 3,
                column: 4,
            }],
            ..Default::default()
        };
        let md = render(&data);
        assert!(md.contains("| /a\\|b |  | - | no |"));
        assert!(md.contains("| <anonymous> | x | 3:4 |"));
    }
}
