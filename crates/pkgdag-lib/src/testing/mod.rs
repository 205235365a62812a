//! Test fixtures for pkgdag
//!
//! Shared by the unit tests and by the end-to-end crate (through the
//! `test-utils` feature):
//! - Definition builders for in-memory stores
//! - Temporary definition and repository directories on disk

pub mod filesystem;

pub use filesystem::DefinitionDir;

use crate::dag::{Graph, GraphOptions};
use crate::store::{Definition, PackageStore, StoreError};
use std::sync::Arc;

/// Definition `name` at `version`, epoch 0, depending on `deps`
pub fn definition(name: &str, version: &str, deps: &[&str]) -> Definition {
    Definition::new(name, version, 0).with_dependencies(deps.iter().copied())
}

/// Store over `definitions`, in order
pub fn store(definitions: Vec<Definition>) -> Result<Arc<PackageStore>, StoreError> {
    PackageStore::from_definitions(definitions).map(Arc::new)
}

/// Build a graph over `definitions` with default options
pub fn graph(definitions: Vec<Definition>) -> Result<Graph, Box<dyn std::error::Error>> {
    graph_with(definitions, GraphOptions::default())
}

pub fn graph_with(
    definitions: Vec<Definition>,
    opts: GraphOptions,
) -> Result<Graph, Box<dyn std::error::Error>> {
    Ok(Graph::build(store(definitions)?, opts)?)
}

/// Vertex key of a local package at `version`, epoch 0
pub fn local_key(name: &str, version: &str) -> String {
    format!("{name}:{version}-r0@local")
}

/// Render `definition` as a YAML document in the on-disk layout
pub fn definition_yaml(definition: &Definition) -> String {
    fn list(out: &mut String, indent: &str, key: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        out.push_str(&format!("{indent}{key}:\n"));
        for item in items {
            out.push_str(&format!("{indent}  - \"{item}\"\n"));
        }
    }

    let mut out = String::new();
    out.push_str("package:\n");
    out.push_str(&format!("  name: {}\n", definition.package.name));
    out.push_str(&format!("  version: \"{}\"\n", definition.package.version));
    out.push_str(&format!("  epoch: {}\n", definition.package.epoch));
    if !definition.package.dependencies.provides.is_empty() {
        out.push_str("  dependencies:\n");
        list(
            &mut out,
            "    ",
            "provides",
            &definition.package.dependencies.provides,
        );
    }

    if !definition.subpackages.is_empty() {
        out.push_str("subpackages:\n");
        for sub in &definition.subpackages {
            out.push_str(&format!("  - name: {}\n", sub.name));
            if !sub.dependencies.provides.is_empty() {
                out.push_str("    dependencies:\n");
                list(&mut out, "      ", "provides", &sub.dependencies.provides);
            }
        }
    }

    let contents = &definition.environment.contents;
    out.push_str("environment:\n  contents:\n");
    list(&mut out, "    ", "repositories", &contents.repositories);
    list(&mut out, "    ", "keyring", &contents.keyring);
    list(&mut out, "    ", "packages", &contents.packages);
    if contents.repositories.is_empty()
        && contents.keyring.is_empty()
        && contents.packages.is_empty()
    {
        out.push_str("    packages: []\n");
    }
    out
}
