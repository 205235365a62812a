use clap::{ArgGroup, Parser, Subcommand};

use super::config::AppConfig;

/// pkgdag CLI - package dependency graph inspection
#[derive(Debug, Clone, Parser)]
#[command(name = "pkgdag")]
#[command(about = "Resolve package build definitions into a dependency graph")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// pkgdag commands
    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration loaded from CLI
#[derive(Debug)]
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Commands,
}

/// Available pkgdag commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print every package in topological order (dependents first)
    Sort {
        /// Print dependencies before dependents instead (build order)
        #[arg(long)]
        reverse: bool,
    },

    /// Print the immediate dependencies of a package key
    Deps {
        /// Vertex key, `name:version@source`
        key: String,
    },

    /// Print every vertex key
    Nodes {
        /// Only packages with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the origin package names
    Packages,

    /// Print the build order of a subgraph
    #[command(group(ArgGroup::new("selection").required(true).args(["roots", "leaves"])))]
    Subgraph {
        /// Packages whose dependencies are included
        #[arg(long, value_delimiter = ',')]
        roots: Vec<String>,

        /// Packages whose dependents are included
        #[arg(long, value_delimiter = ',')]
        leaves: Vec<String>,
    },

    /// Print the vertex keys that pass a source filter
    #[command(group(
        ArgGroup::new("predicate")
            .required(true)
            .args(["local", "not_local", "sources", "not_sources"])
    ))]
    Filter {
        /// Keep locally built packages
        #[arg(long)]
        local: bool,

        /// Keep packages from upstream repositories (and unresolved ones)
        #[arg(long)]
        not_local: bool,

        /// Keep packages from these sources
        #[arg(long = "source", value_delimiter = ',')]
        sources: Vec<String>,

        /// Drop packages from these sources
        #[arg(long = "not-source", value_delimiter = ',')]
        not_sources: Vec<String>,
    },
}

impl Commands {
    /// Command name for log output
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Sort { .. } => "sort",
            Commands::Deps { .. } => "deps",
            Commands::Nodes { .. } => "nodes",
            Commands::Packages => "packages",
            Commands::Subgraph { .. } => "subgraph",
            Commands::Filter { .. } => "filter",
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
