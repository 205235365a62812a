//! Integration tests for `pkgdag subgraph` and `pkgdag filter`

use anyhow::Result;
use pkgdag_lib::application::Commands;
use pkgdag_lib::repository::RepositoryIndex;
use pkgdag_lib::testing::definition;
use pkgdag_tests::TestEnvironment;
use pkgdag_tests::fixtures::{assert_precedes, base_system, external, local};

fn subgraph(roots: &[&str], leaves: &[&str]) -> Commands {
    Commands::Subgraph {
        roots: roots.iter().map(|s| s.to_string()).collect(),
        leaves: leaves.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_subgraph_with_roots_keeps_dependency_closure() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;

    let order = env.run(subgraph(&["curl"], &[]))?;
    assert_eq!(order.len(), 4);
    assert!(!order.contains(&local("busybox", "1.36.1")));
    assert_eq!(order[0], local("glibc", "2.38"));
    assert_eq!(order[3], local("curl", "8.4.0"));

    Ok(())
}

#[test]
fn test_subgraph_with_leaves_keeps_dependants() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;

    let order = env.run(subgraph(&[], &["zlib"]))?;
    assert_eq!(order, [local("zlib", "1.3"), local("curl", "8.4.0")]);

    let order = env.run(subgraph(&[], &["glibc"]))?;
    assert_eq!(order.len(), 5);
    assert_precedes(&order, &local("openssl", "3.1.4"), &local("curl", "8.4.0"));

    Ok(())
}

#[test]
fn test_subgraph_with_unknown_leaf_fails() -> Result<()> {
    let env = TestEnvironment::with_definitions(base_system())?;

    let message = format!("{:#}", env.run(subgraph(&[], &["musl"])).unwrap_err());
    assert!(message.contains("unable to find package musl"), "{message}");

    Ok(())
}

#[test]
fn test_filter_by_source() -> Result<()> {
    let env = TestEnvironment::new()?;
    let repo = env.write_repository(
        "repo",
        &RepositoryIndex::new("", "x86_64").with_entry("ca-certificates", "20240226-r0", &[]),
    )?;
    env.write_definition(
        &definition("curl", "8.4.0", &["ca-certificates"]).with_repositories([repo.as_str()]),
    )?;

    let only_repo = env.run(Commands::Filter {
        local: false,
        not_local: false,
        sources: vec![repo.clone()],
        not_sources: Vec::new(),
    })?;
    assert_eq!(only_repo, [external("ca-certificates", "20240226-r0", &repo)]);

    let without_repo = env.run(Commands::Filter {
        local: false,
        not_local: false,
        sources: Vec::new(),
        not_sources: vec![repo],
    })?;
    assert_eq!(without_repo, [local("curl", "8.4.0")]);

    Ok(())
}
