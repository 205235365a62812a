//! Integration tests for cycle repair against on-disk repositories
//!
//! A mutual dependency between two local packages can only be broken when
//! some repository offers another candidate for one side.

use anyhow::Result;
use pkgdag_lib::application::Commands;
use pkgdag_lib::repository::RepositoryIndex;
use pkgdag_lib::testing::definition;
use pkgdag_tests::TestEnvironment;
use pkgdag_tests::fixtures::{external, local};

#[test]
fn test_cycle_repaired_with_repository_candidate() -> Result<()> {
    let env = TestEnvironment::new()?;
    let repo = env.write_repository(
        "repo",
        &RepositoryIndex::new("", "x86_64").with_entry("b", "0.9-r0", &[]),
    )?;
    env.write_definition(&definition("a", "1.0", &["b"]).with_repositories([repo.as_str()]))?;
    env.write_definition(&definition("b", "1.0", &["a"]).with_repositories([repo.as_str()]))?;

    let graph = env.graph()?;
    let (a, b, ext_b) = (local("a", "1.0"), local("b", "1.0"), external("b", "0.9-r0", &repo));

    assert!(!graph.has_edge(&a, &b));
    assert_eq!(graph.edge_origin(&b, &a), Some("a"));
    assert_eq!(graph.edge_origin(&a, &ext_b), Some("b"));
    assert_eq!(env.run(Commands::Sort { reverse: true })?, [ext_b, a, b]);

    Ok(())
}

#[test]
fn test_global_repository_from_config() -> Result<()> {
    let mut env = TestEnvironment::new()?;
    let repo = env.write_repository(
        "global",
        &RepositoryIndex::new("", "x86_64").with_entry("b", "0.9-r0", &[]),
    )?;
    env.write_definition(&definition("a", "1.0", &["b"]))?;
    env.write_definition(&definition("b", "1.0", &["a"]))?;
    env.config_mut().repositories.push(repo.clone());

    let deps = env.run(Commands::Deps {
        key: local("a", "1.0"),
    })?;
    assert_eq!(deps, [external("b", "0.9-r0", &repo)]);

    Ok(())
}

#[test]
fn test_irreparable_cycle_reports_path() -> Result<()> {
    let env = TestEnvironment::with_definitions(vec![
        definition("a", "1.0", &["b"]),
        definition("b", "1.0", &["a"]),
    ])?;

    let message = format!("{:#}", env.graph().unwrap_err());
    assert!(message.contains("unresolvable cycle"), "{message}");
    assert!(
        message.contains(&format!("{} -> {}", local("a", "1.0"), local("b", "1.0"))),
        "{message}"
    );

    Ok(())
}

#[test]
fn test_missing_repository_is_fatal() -> Result<()> {
    let env = TestEnvironment::new()?;
    let gone = env.path().join("gone").to_string_lossy().to_string();
    env.write_definition(&definition("a", "1.0", &[]).with_repositories([gone.as_str()]))?;

    let message = format!("{:#}", env.graph().unwrap_err());
    assert!(message.contains("unable to load repositories for a-1.0-r0"), "{message}");

    Ok(())
}
