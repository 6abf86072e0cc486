//! JSON export implementation.
//!
//! Exports analysis results in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable import record for JSON output.
#[derive(Serialize)]
struct JsonImport<'a> {
    source: &'a str,
    names: &'a [String],
}

#[derive(Serialize)]
struct JsonFileImports<'a> {
    file: String,
    imports: Vec<JsonImport<'a>>,
}

#[derive(Serialize)]
struct JsonRelation<'a> {
    file: String,
    imports: Vec<String>,
    import_map: &'a BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
struct JsonCycle {
    files: Vec<String>,
    path: String,
}

#[derive(Serialize)]
struct JsonRoute<'a> {
    path: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<&'a str>,
    component_exists: bool,
}

#[derive(Serialize)]
struct JsonObject<'a> {
    path: Option<&'a str>,
    keys: &'a [String],
    line: usize,
    column: usize,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    files: usize,
    imports: usize,
    relations: usize,
    cycles: usize,
    matches: usize,
    routes: usize,
    missing_components: usize,
    objects: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    project: &'a str,
    summary: JsonSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    imports: Vec<JsonFileImports<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    relations: Vec<JsonRelation<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    deep: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cycles: Vec<JsonCycle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    matches: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    routes: Vec<JsonRoute<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    objects: Vec<JsonObject<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let imports: Vec<JsonFileImports> = data
            .file_imports
            .iter()
            .map(|f| JsonFileImports {
                file: data.display_path(&f.file),
                imports: f
                    .imports
                    .iter()
                    .map(|r| JsonImport {
                        source: &r.source_path,
                        names: &r.imported_names,
                    })
                    .collect(),
            })
            .collect();

        let relations: Vec<JsonRelation> = data
            .relations
            .iter()
            .map(|r| JsonRelation {
                file: data.display_path(&r.target_file),
                imports: r
                    .relation_files
                    .iter()
                    .map(|f| data.display_path(f))
                    .collect(),
                import_map: &r.import_map,
            })
            .collect();

        let cycles: Vec<JsonCycle> = data
            .cycles
            .iter()
            .map(|c| {
                let files: Vec<String> = c.files.iter().map(|f| data.display_path(f)).collect();
                let mut path = files.clone();
                path.extend(files.first().cloned());
                JsonCycle {
                    path: path.join(" -> "),
                    files,
                }
            })
            .collect();

        let routes: Vec<JsonRoute> = data
            .routes
            .iter()
            .map(|r| JsonRoute {
                path: &r.route_path,
                title: &r.title,
                component: r.relative_file_path.as_deref(),
                component_exists: r.component_file_exists,
            })
            .collect();

        let objects: Vec<JsonObject> = data
            .objects
            .iter()
            .map(|o| JsonObject {
                path: o.path.as_deref(),
                keys: &o.keys,
                line: o.line,
                column: o.column,
            })
            .collect();

        let export = JsonExport {
            project: &data.project_name,
            summary: JsonSummary {
                files: data.file_imports.len().max(data.relations.len()),
                imports: data.import_count(),
                relations: data.relation_count(),
                cycles: data.cycles.len(),
                matches: data.matches.len(),
                routes: data.routes.len(),
                missing_components: data.missing_component_count(),
                objects: data.objects.len(),
            },
            imports,
            relations,
            deep: data.deep,
            cycles,
            matches: data.matches.iter().map(|m| data.display_path(m)).collect(),
            routes,
            objects,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FileImport, FileRelation, PageRoute};
    use crate::graph::CycleInfo;
    use crate::visitor::ImportRecord;
    use std::path::{Path, PathBuf};

    fn export_json(data: &ExportData) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(data, &mut output).unwrap();
        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    fn create_test_data() -> ExportData {
        ExportData::new("shop")
            .with_root(Path::new("/work/shop"))
            .with_imports(vec![FileImport {
                file: PathBuf::from("/work/shop/src/main.jsx"),
                imports: vec![
                    ImportRecord {
                        source_path: "react".to_string(),
                        imported_names: vec!["React".to_string()],
                    },
                    ImportRecord {
                        source_path: "./App".to_string(),
                        imported_names: vec!["App".to_string()],
                    },
                ],
            }])
    }

    #[test]
    fn test_json_export_basic() {
        let parsed = export_json(&create_test_data());

        assert_eq!(parsed["project"], "shop");
        assert_eq!(parsed["summary"]["files"], 1);
        assert_eq!(parsed["summary"]["imports"], 2);
        assert_eq!(parsed["imports"][0]["file"], "src/main.jsx");
        assert_eq!(parsed["imports"][0]["imports"][1]["source"], "./App");
        assert_eq!(parsed["imports"][0]["imports"][1]["names"][0], "App");
    }

    #[test]
    fn test_json_export_omits_empty_sections() {
        let parsed = export_json(&create_test_data());
        assert!(parsed.get("relations").is_none());
        assert!(parsed.get("routes").is_none());
        assert!(parsed.get("deep").is_none());
        assert_eq!(parsed["summary"]["routes"], 0);
    }

    #[test]
    fn test_json_export_relations_and_cycles() {
        let mut import_map = BTreeMap::new();
        import_map.insert("./b".to_string(), vec!["b".to_string()]);
        let data = ExportData::new("p")
            .with_root(Path::new("/p"))
            .with_relations(
                vec![FileRelation {
                    target_file: PathBuf::from("/p/src/a.js"),
                    relation_files: vec![PathBuf::from("/p/src/b.js")],
                    import_map,
                }],
                true,
            )
            .with_cycles(vec![CycleInfo {
                files: vec![PathBuf::from("/p/src/a.js"), PathBuf::from("/p/src/b.js")],
            }]);

        let parsed = export_json(&data);
        assert_eq!(parsed["deep"], true);
        assert_eq!(parsed["relations"][0]["file"], "src/a.js");
        assert_eq!(parsed["relations"][0]["imports"][0], "src/b.js");
        assert_eq!(parsed["relations"][0]["import_map"]["./b"][0], "b");
        assert_eq!(parsed["cycles"][0]["files"][1], "src/b.js");
        assert_eq!(parsed["cycles"][0]["path"], "src/a.js -> src/b.js -> src/a.js");
        assert_eq!(parsed["summary"]["cycles"], 1);
    }

    #[test]
    fn test_json_export_routes() {
        let data = ExportData::new("p").with_routes(vec![
            PageRoute {
                route_path: "/".to_string(),
                title: "Home".to_string(),
                component_file: Some(PathBuf::from("/p/src/Home.jsx")),
                relative_file_path: Some("src/Home.jsx".to_string()),
                component_file_exists: false,
            },
            PageRoute {
                route_path: "/about".to_string(),
                title: String::new(),
                component_file: None,
                relative_file_path: None,
                component_file_exists: false,
            },
        ]);

        let parsed = export_json(&data);
        assert_eq!(parsed["routes"][0]["component"], "src/Home.jsx");
        assert!(parsed["routes"][1].get("component").is_none());
        assert_eq!(parsed["summary"]["missing_components"], 1);
    }
}
