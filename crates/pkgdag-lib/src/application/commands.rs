//! Command execution handlers
//!
//! Every command loads the definition directory, builds the dependency
//! graph once, then answers from it. Results go to stdout one key or name
//! per line; diagnostics go through the logger.

use crate::application::env::EnvironmentConfig;
use crate::application::{AppConfig, CliConfig, Commands};
use crate::dag::{
    Filter, Graph, filter_local, filter_not_local, filter_not_sources, filter_sources,
};
use crate::logger::Logger;
use crate::package::Package;
use crate::store::PackageStore;
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Execute CLI commands against the configured definition directory
pub fn execute_command(config: CliConfig) -> Result<()> {
    let env = EnvironmentConfig::load().context("Failed to read environment")?;
    Logger::init(config.app_config.to_logger_config(&env))
        .context("Failed to initialize logging")?;

    info!("Running {}", config.command.name());
    let graph = load_graph(&config.app_config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_command_with_writer(config.command, &graph, &mut out)
}

/// Load the definition store and build its graph
pub fn load_graph(config: &AppConfig) -> Result<Graph> {
    let dir = config.definitions_dir()?;
    let store = PackageStore::load_dir(dir)
        .with_context(|| format!("Failed to load definitions from {}", dir.display()))?;
    debug!("Building graph over {} packages", store.len());

    Graph::build(Arc::new(store), config.graph_options()).context("Failed to build dependency graph")
}

/// Execute a specific command against a built graph (for testing)
pub fn execute_command_with_writer(
    command: Commands,
    graph: &Graph,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Sort { reverse } => handle_sort(graph, reverse, out),
        Commands::Deps { key } => handle_deps(graph, &key, out),
        Commands::Nodes { name } => handle_nodes(graph, name.as_deref(), out),
        Commands::Packages => write_lines(out, graph.packages()),
        Commands::Subgraph { roots, leaves } => handle_subgraph(graph, &roots, &leaves, out),
        Commands::Filter {
            local,
            not_local,
            sources,
            not_sources,
        } => handle_filter(graph, local, not_local, sources, not_sources, out),
    }
}

fn handle_sort(graph: &Graph, reverse: bool, out: &mut dyn Write) -> Result<()> {
    let packages = if reverse {
        graph.reverse_sorted()?
    } else {
        graph.sorted()?
    };
    write_lines(out, packages.into_iter().map(Package::key))
}

fn handle_deps(graph: &Graph, key: &str, out: &mut dyn Write) -> Result<()> {
    if !graph.contains(key) {
        warn!("No package with key {}", key);
    }
    write_lines(out, graph.dependencies_of(key))
}

fn handle_nodes(graph: &Graph, name: Option<&str>, out: &mut dyn Write) -> Result<()> {
    match name {
        Some(name) => {
            let mut keys: Vec<String> = graph
                .nodes_by_name(name)
                .into_iter()
                .map(Package::key)
                .collect();
            keys.sort();
            write_lines(out, keys)
        }
        None => write_lines(out, graph.nodes()),
    }
}

fn handle_subgraph(
    graph: &Graph,
    roots: &[String],
    leaves: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let subgraph = match (roots.is_empty(), leaves.is_empty()) {
        (false, true) => graph.subgraph_with_roots(roots)?,
        (true, false) => graph.subgraph_with_leaves(leaves)?,
        _ => bail!("Exactly one of --roots or --leaves is required"),
    };
    debug!(
        "Subgraph has {} of {} vertices",
        subgraph.node_count(),
        graph.node_count()
    );

    let packages = subgraph.reverse_sorted()?;
    write_lines(out, packages.into_iter().map(Package::key))
}

fn handle_filter(
    graph: &Graph,
    local: bool,
    not_local: bool,
    sources: Vec<String>,
    not_sources: Vec<String>,
    out: &mut dyn Write,
) -> Result<()> {
    let filter: Filter = if local {
        filter_local()
    } else if not_local {
        filter_not_local()
    } else if !sources.is_empty() {
        filter_sources(sources)
    } else if !not_sources.is_empty() {
        filter_not_sources(not_sources)
    } else {
        bail!("A filter predicate is required");
    };

    write_lines(out, graph.filter(filter).nodes())
}

fn write_lines<I, S>(out: &mut dyn Write, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        writeln!(out, "{}", line.as_ref()).context("Failed to write output")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
