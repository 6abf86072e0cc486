use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use jsxscope::analysis::{self, FileImport, ImportQuery, ProjectScanner};
use jsxscope::config::{Language, ProjectConfig};
use jsxscope::export::{self, ExportData, ExportFormat};
use jsxscope::graph::FileGraph;
use jsxscope::visitor::{ImportVisitor, ObjectVisitor};

#[derive(Parser)]
#[command(name = "jsxscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Static import and object-literal analyzer for JavaScript/JSX projects")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (json, markdown)
    #[arg(short, long, global = true, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Project configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Languages to scan, overriding the configuration (js, ts)
    #[arg(short, long, global = true, value_delimiter = ',')]
    languages: Vec<Language>,

    /// Stop parsing after the import section of each file
    #[arg(long, global = true)]
    import_only: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the syntax tree of a file as JSON
    Ast {
        /// Source file to parse
        file: PathBuf,
    },
    /// List the imports of a file, or of every file in a project
    Imports {
        /// Source file or project root
        path: PathBuf,
    },
    /// List the object literals of a file
    Objects {
        /// Source file to parse
        file: PathBuf,
    },
    /// Show which project files each file imports
    Relations {
        /// Project root (must contain `src`)
        project: PathBuf,

        /// Report the transitive imports of each root file instead
        #[arg(short, long)]
        deep: bool,
    },
    /// Find files importing from a module
    Find {
        /// Project root (must contain `src`)
        project: PathBuf,

        /// Import source, e.g. `react` or `@/api`
        source: String,

        /// Imported names to look for; any import of the source matches when omitted
        names: Vec<String>,
    },
    /// Extract react-router page routes
    Routes {
        /// Project root (must contain `src` and `package.json`)
        project: PathBuf,

        /// Route file relative to the project root; all files are searched when omitted
        route_file: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data = execute(&cli)?;
    if let Some(data) = data {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        export::export(cli.format, &data, &mut out).context("Failed to write report")?;
        out.flush()?;
    }
    Ok(())
}

/// Initialize tracing subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Runs one command. Returns the report to print, or `None` when the
/// command already wrote its output.
fn execute(cli: &Cli) -> Result<Option<ExportData>> {
    match &cli.command {
        Commands::Ast { file } => {
            let parsed = analysis::parse_file(file, cli.import_only)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            let json = serde_json::to_string_pretty(&parsed).context("Failed to serialize AST")?;
            println!("{}", json);
            Ok(None)
        }
        Commands::Imports { path } => {
            if path.is_file() {
                let parsed = analysis::parse_file(path, cli.import_only)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                let imports = vec![FileImport {
                    file: path.clone(),
                    imports: ImportVisitor::collect(&parsed),
                }];
                return Ok(Some(ExportData::new(file_label(path)).with_imports(imports)));
            }
            let scanner = scanner(cli, path)?;
            let imports = scanner.file_imports();
            info!(files = imports.len(), "collected imports");
            Ok(Some(
                ExportData::new(file_label(scanner.root()))
                    .with_root(scanner.root())
                    .with_imports(imports),
            ))
        }
        Commands::Objects { file } => {
            let parsed = analysis::parse_file(file, cli.import_only)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            let records = ObjectVisitor::collect(&parsed);
            debug!(objects = records.len(), "collected object literals");
            Ok(Some(ExportData::new(file_label(file)).with_objects(&records)))
        }
        Commands::Relations { project, deep } => {
            let scanner = scanner(cli, project)?;
            let relations = scanner.file_relations();
            let cycles = FileGraph::from_relations(&relations).cycles();
            let relations = if *deep {
                ProjectScanner::deep_relations(&relations)
            } else {
                relations
            };
            Ok(Some(
                ExportData::new(file_label(scanner.root()))
                    .with_root(scanner.root())
                    .with_relations(relations, *deep)
                    .with_cycles(cycles),
            ))
        }
        Commands::Find {
            project,
            source,
            names,
        } => {
            let scanner = scanner(cli, project)?;
            let query = if names.is_empty() {
                ImportQuery::new().any(source.as_str())
            } else {
                ImportQuery::new().names(source.as_str(), names)
            };
            let matches = scanner.find_files_with_import(&query);
            Ok(Some(
                ExportData::new(file_label(scanner.root()))
                    .with_root(scanner.root())
                    .with_matches(matches),
            ))
        }
        Commands::Routes {
            project,
            route_file,
        } => {
            let scanner = scanner(cli, project)?;
            let routes = match route_file {
                Some(route_file) => scanner
                    .route_defines(route_file)
                    .with_context(|| format!("Failed to read routes from {}", route_file))?,
                None => scanner
                    .find_page_routes()
                    .context("Failed to discover page routes")?,
            };
            Ok(Some(
                ExportData::new(file_label(scanner.root()))
                    .with_root(scanner.root())
                    .with_routes(routes),
            ))
        }
    }
}

/// Builds the project configuration from `--config` and `--languages`.
fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ProjectConfig::default(),
    };
    if cli.languages.is_empty() {
        Ok(config)
    } else {
        Ok(config.with_languages(cli.languages.clone()))
    }
}

fn scanner(cli: &Cli, project: &Path) -> Result<ProjectScanner> {
    let config = load_config(cli)?;
    let project = project
        .canonicalize()
        .with_context(|| format!("Project not found: {}", project.display()))?;
    ProjectScanner::new(&project, config)
        .with_context(|| format!("Failed to open project {}", project.display()))
}

/// Last path component, used as the report title.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
