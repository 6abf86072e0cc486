//! Route-table extraction.
//!
//! A route file default-exports an array of route objects, either directly
//! or through a top-level binding:
//!
//! ```text
//! import Home from './pages/Home';
//!
//! const routes = [
//!   { path: '/', title: 'Home', component: Home },
//!   { path: '/orders', lazy: () => import('./pages/Orders') },
//! ];
//!
//! export default routes;
//! ```
//!
//! Every element object with a string `path` becomes a [`PageRoute`]. Its
//! component file comes from a `lazy` dynamic import, or failing that from
//! a `component` identifier bound by an import declaration.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::ast::{ArrayExpression, Expression, File, ObjectExpression, SpecifierKind};

use super::project::ProjectScanner;
use super::resolve::Resolver;
use super::source::parse_file;
use super::{AnalysisError, AnalysisResult};

/// One route declared in a route file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRoute {
    pub route_path: String,
    /// Empty when the route declares no title.
    pub title: String,
    pub component_file: Option<PathBuf>,
    /// `component_file` relative to the project root, `/`-separated.
    pub relative_file_path: Option<String>,
    pub component_file_exists: bool,
}

impl ProjectScanner {
    /// Extracts the routes declared by one route file.
    ///
    /// # Arguments
    ///
    /// * `relative_path` - Route file path relative to the project root,
    ///   e.g. `src/routes/index.js`
    ///
    /// # Returns
    ///
    /// The routes in declaration order; empty when the file has no
    /// default-exported route array.
    pub fn route_defines(&self, relative_path: &str) -> AnalysisResult<Vec<PageRoute>> {
        let relative_path = relative_path.trim();
        if relative_path.is_empty() {
            return Err(AnalysisError::EmptyRouteFile);
        }

        let route_file = self.resolver().root().join(relative_path);
        if !route_file.is_file() {
            return Err(AnalysisError::RouteFileMissing(route_file));
        }

        let file = parse_file(&route_file, false)?;
        let routes = extract_routes(&file, &route_file, self.resolver());
        debug!(file = relative_path, routes = routes.len(), "extracted routes");
        Ok(routes)
    }

    /// Extracts routes from every source file of a project that routes
    /// with `react-router` or `react-router-dom`.
    ///
    /// Files without a default-exported route array contribute nothing;
    /// unreadable files are logged and skipped.
    pub fn find_page_routes(&self) -> AnalysisResult<Vec<PageRoute>> {
        let router = self.require_router()?;
        debug!(router, "discovering routes");

        let routes = self
            .source_files()
            .into_par_iter()
            .map(|path| match parse_file(&path, false) {
                Ok(file) => extract_routes(&file, &path, self.resolver()),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping file");
                    Vec::new()
                }
            })
            .flatten()
            .collect();
        Ok(routes)
    }
}

/// Extracts the routes of an already-parsed route file.
///
/// `route_file` anchors relative imports; `resolver` maps them to files.
pub fn extract_routes(file: &File, route_file: &Path, resolver: &Resolver) -> Vec<PageRoute> {
    let extractor = RouteExtractor::new(file, route_file, resolver);
    file.program
        .body
        .iter()
        .filter_map(|statement| statement.as_export_default())
        .filter_map(|export| export.declaration.as_ref())
        .flat_map(|declaration| extractor.routes_of(declaration))
        .collect()
}

struct RouteExtractor<'a> {
    route_file: &'a Path,
    resolver: &'a Resolver,
    /// Top-level `name = init` bindings.
    bindings: HashMap<&'a str, &'a Expression>,
    /// Local import names mapped to the file they import.
    components: HashMap<&'a str, Option<PathBuf>>,
}

impl<'a> RouteExtractor<'a> {
    fn new(file: &'a File, route_file: &'a Path, resolver: &'a Resolver) -> Self {
        let mut bindings = HashMap::new();
        let mut components = HashMap::new();

        for statement in &file.program.body {
            if let Some(decl) = statement.as_variable() {
                for declarator in &decl.declarations {
                    if let Some(init) = &declarator.init {
                        bindings.insert(declarator.id.name.as_str(), init);
                    }
                }
            }

            let Some(import) = statement.as_import() else {
                continue;
            };
            let Some(source) = &import.source else {
                continue;
            };
            if import.specifiers.is_empty() {
                continue;
            }
            let resolved = resolver.resolve_component(route_file, source.unquoted());
            for specifier in &import.specifiers {
                if specifier.specifier_kind == SpecifierKind::Namespace {
                    continue;
                }
                let local = specifier.local.name.as_str();
                if !local.is_empty() {
                    components.insert(local, resolved.clone());
                }
            }
        }

        Self {
            route_file,
            resolver,
            bindings,
            components,
        }
    }

    /// Routes of a default-exported expression: an array, or an identifier
    /// bound (possibly through other identifiers) to one.
    fn routes_of(&self, declaration: &'a Expression) -> Vec<PageRoute> {
        let mut seen = HashSet::new();
        let mut current = declaration;
        loop {
            match current {
                Expression::ArrayExpression(array) => return self.routes_of_array(array),
                Expression::Identifier(id) => {
                    if !seen.insert(id.name.as_str()) {
                        return Vec::new();
                    }
                    match self.bindings.get(id.name.as_str()) {
                        Some(&bound) => current = bound,
                        None => return Vec::new(),
                    }
                }
                _ => return Vec::new(),
            }
        }
    }

    fn routes_of_array(&self, array: &ArrayExpression) -> Vec<PageRoute> {
        array
            .elements
            .iter()
            .filter_map(Expression::as_object)
            .filter_map(|object| self.route_of(object))
            .collect()
    }

    fn route_of(&self, object: &ObjectExpression) -> Option<PageRoute> {
        let mut path = None;
        let mut title = None;
        let mut component_file = None;

        for property in &object.properties {
            let Some(name) = property.key_name() else {
                continue;
            };
            let value = property.value.as_ref();
            match name {
                "path" => path = value.and_then(string_value),
                "title" => title = value.and_then(string_value),
                "lazy" => component_file = value.and_then(|v| self.lazy_component(v)),
                "component" if component_file.is_none() => {
                    component_file = value.and_then(|v| self.imported_component(v));
                }
                _ => {}
            }
        }

        let route_path = path?;
        let component_file_exists = component_file.as_deref().is_some_and(Path::exists);
        Some(PageRoute {
            route_path,
            title: title.unwrap_or_default(),
            relative_file_path: component_file
                .as_deref()
                .map(|f| self.resolver.relative_path(f)),
            component_file,
            component_file_exists,
        })
    }

    /// `() => import('x')` or a bare `import('x')`.
    fn lazy_component(&self, value: &Expression) -> Option<PathBuf> {
        if let Some(arrow) = value.as_arrow() {
            if let Some(found) = arrow.body.as_deref().and_then(|b| self.import_call(b)) {
                return Some(found);
            }
        }
        self.import_call(value)
    }

    fn import_call(&self, value: &Expression) -> Option<PathBuf> {
        let call = value.as_call()?;
        if !call.is_dynamic_import() {
            return None;
        }
        let source = call.arguments.first()?.as_string()?;
        self.resolver.resolve_component(self.route_file, source.unquoted())
    }

    fn imported_component(&self, value: &Expression) -> Option<PathBuf> {
        let id = value.as_identifier()?;
        self.components.get(id.name.as_str()).cloned().flatten()
    }
}

fn string_value(value: &Expression) -> Option<String> {
    value.as_string().map(|s| s.unquoted().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::parser::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project(routes: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "package.json",
            r#"{"dependencies": {"react": "18", "react-router": "6"}}"#,
        );
        write(&dir, "src/pages/Home.jsx", "export default () => null;");
        write(&dir, "src/pages/Orders/index.jsx", "export default () => null;");
        write(&dir, "src/routes.js", routes);
        dir
    }

    fn routes(source: &str) -> (TempDir, Vec<PageRoute>) {
        let dir = project(source);
        let scanner = ProjectScanner::new(dir.path(), ProjectConfig::default()).unwrap();
        let routes = scanner.route_defines("src/routes.js").unwrap();
        (dir, routes)
    }

    #[test]
    fn test_lazy_and_component_routes() {
        let (_dir, routes) = routes(
            "import Home from './pages/Home';\n\
             export default [\n\
               { path: '/', title: 'Home', component: Home },\n\
               { path: '/orders', title: \"Orders\", lazy: () => import('./pages/Orders') },\n\
             ];\n",
        );
        assert_eq!(routes.len(), 2);

        assert_eq!(routes[0].route_path, "/");
        assert_eq!(routes[0].title, "Home");
        assert_eq!(routes[0].relative_file_path.as_deref(), Some("src/pages/Home.jsx"));
        assert!(routes[0].component_file_exists);

        assert_eq!(routes[1].route_path, "/orders");
        assert_eq!(routes[1].title, "Orders");
        assert_eq!(
            routes[1].relative_file_path.as_deref(),
            Some("src/pages/Orders/index.jsx")
        );
        assert!(routes[1].component_file_exists);
    }

    #[test]
    fn test_export_of_bound_identifier() {
        let (_dir, routes) = routes(
            "const base = [{ path: '/a' }];\nconst routes = base;\nexport default routes;\n",
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].route_path, "/a");
        assert_eq!(routes[0].title, "");
        assert_eq!(routes[0].component_file, None);
        assert_eq!(routes[0].relative_file_path, None);
        assert!(!routes[0].component_file_exists);
    }

    #[test]
    fn test_cyclic_bindings_yield_nothing() {
        let (_dir, routes) = routes("const a = b;\nconst b = a;\nexport default a;\n");
        assert!(routes.is_empty());
    }

    #[test]
    fn test_objects_without_path_are_skipped() {
        let (_dir, routes) = routes(
            "export default [{ title: 'x' }, { path: 42 }, 'str', \
             { 'path': '/quoted', meta: {} }];\n",
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].route_path, "/quoted");
    }

    #[test]
    fn test_lazy_overrides_component() {
        let (_dir, routes) = routes(
            "import Home from './pages/Home';\n\
             export default [{ component: Home, path: '/', \
             lazy: () => import('./pages/Orders') }];\n",
        );
        assert_eq!(
            routes[0].relative_file_path.as_deref(),
            Some("src/pages/Orders/index.jsx")
        );
    }

    #[test]
    fn test_missing_component_file() {
        let (_dir, routes) = routes(
            "import Gone from './pages/Gone';\n\
             export default [\n\
               { path: '/gone', component: Gone },\n\
               { path: '/later', lazy: () => import('./pages/Later.jsx') },\n\
               { path: '/pkg', component: Unknown },\n\
             ];\n",
        );
        assert_eq!(
            routes[0].relative_file_path.as_deref(),
            Some("src/pages/Gone/index.tsx")
        );
        assert!(!routes[0].component_file_exists);
        assert_eq!(routes[1].relative_file_path.as_deref(), Some("src/pages/Later.jsx"));
        assert!(!routes[1].component_file_exists);
        assert_eq!(routes[2].component_file, None);
    }

    #[test]
    fn test_non_array_default_export() {
        let (_dir, routes) = routes("export default { path: '/' };\n");
        assert!(routes.is_empty());
    }

    #[test]
    fn test_route_file_errors() {
        let dir = project("export default [];");
        let scanner = ProjectScanner::new(dir.path(), ProjectConfig::default()).unwrap();
        assert!(matches!(
            scanner.route_defines("  ").unwrap_err(),
            AnalysisError::EmptyRouteFile
        ));
        assert!(matches!(
            scanner.route_defines("src/nope.js").unwrap_err(),
            AnalysisError::RouteFileMissing(_)
        ));
        assert!(matches!(
            scanner.route_defines("src/pages").unwrap_err(),
            AnalysisError::RouteFileMissing(_)
        ));
    }

    #[test]
    fn test_find_page_routes() {
        let dir = project("export default [{ path: '/' }, { path: '/about' }];");
        let scanner = ProjectScanner::new(dir.path(), ProjectConfig::default()).unwrap();
        let routes = scanner.find_page_routes().unwrap();
        let paths: Vec<_> = routes.iter().map(|r| r.route_path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/about"]);

        write(&dir, "package.json", r#"{"dependencies": {"react": "18"}}"#);
        assert!(matches!(
            scanner.find_page_routes().unwrap_err(),
            AnalysisError::RouterMissing
        ));
    }

    #[test]
    fn test_extract_routes_from_source() {
        let dir = project("");
        let resolver = Resolver::new(dir.path(), &ProjectConfig::default());
        let file = Parser::from_source(
            "export default [{ path: '/x', lazy: () => import('@/pages/Home') }];",
        )
        .parse(false);
        let routes = extract_routes(&file, &dir.path().join("src/routes.js"), &resolver);
        assert_eq!(routes[0].relative_file_path.as_deref(), Some("src/pages/Home.jsx"));
    }
}
