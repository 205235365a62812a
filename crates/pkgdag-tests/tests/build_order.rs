//! Integration tests for graph construction from a definition directory
//!
//! Covers the path the CLI takes: YAML files on disk, loaded into a store,
//! built into a graph, then printed in build order.

use anyhow::Result;
use pkgdag_lib::application::Commands;
use pkgdag_tests::TestEnvironment;
use pkgdag_tests::fixtures::{assert_precedes, base_system, local};

#[test]
fn test_build_order_respects_dependencies() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;

    let order = env.run(Commands::Sort { reverse: true })?;
    assert_eq!(order.len(), 5);
    assert_eq!(order[0], local("glibc", "2.38"));
    assert_precedes(&order, &local("zlib", "1.3"), &local("curl", "8.4.0"));
    assert_precedes(&order, &local("openssl", "3.1.4"), &local("curl", "8.4.0"));

    // forward order is the exact reverse
    let mut forward = env.run(Commands::Sort { reverse: false })?;
    forward.reverse();
    assert_eq!(forward, order);

    Ok(())
}

#[test]
fn test_subpackage_and_provides_resolve_to_origins() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;

    let deps = env.run(Commands::Deps {
        key: local("curl", "8.4.0"),
    })?;
    assert_eq!(deps, [local("openssl", "3.1.4"), local("zlib", "1.3")]);

    let graph = env.graph()?;
    assert_eq!(
        graph.edge_origin(&local("curl", "8.4.0"), &local("zlib", "1.3")),
        Some("so:libz.so.1")
    );
    assert!(!graph.contains(&local("libcrypto3", "3.1.4")));

    Ok(())
}

#[test]
fn test_packages_and_nodes_listing() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;

    assert_eq!(
        env.run(Commands::Packages)?,
        ["busybox", "curl", "glibc", "openssl", "zlib"]
    );
    assert_eq!(
        env.run(Commands::Nodes {
            name: Some("glibc".to_string())
        })?,
        [local("glibc", "2.38")]
    );
    assert!(
        env.run(Commands::Nodes {
            name: Some("musl".to_string())
        })?
        .is_empty()
    );

    Ok(())
}

#[test]
fn test_malformed_definition_fails_to_load() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;
    env.write_file("broken.yaml", "package: [not, a, mapping]\n")?;

    let err = env.graph().unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load definitions"));

    Ok(())
}

#[test]
fn test_empty_directory_builds_empty_graph() -> Result<()> {
    let env = TestEnvironment::new()?;

    let graph = env.graph()?;
    assert_eq!(graph.node_count(), 0);
    assert!(env.run(Commands::Sort { reverse: true })?.is_empty());

    Ok(())
}
