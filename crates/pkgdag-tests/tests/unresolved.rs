//! Integration tests for dependencies nothing can satisfy

use anyhow::Result;
use pkgdag_lib::application::Commands;
use pkgdag_lib::testing::definition;
use pkgdag_tests::TestEnvironment;
use pkgdag_tests::fixtures::local;

fn environment() -> Result<TestEnvironment> {
    TestEnvironment::with_definitions(vec![
        definition("a", "1.0", &["b", "ghost"]),
        definition("b", "1.0", &["phantom"]),
    ])
}

#[test]
fn test_unresolved_dependencies_are_all_reported() -> Result<()> {
    let env = environment()?;

    let message = format!("{:#}", env.graph().unwrap_err());
    assert!(message.contains("unable to build graph"), "{message}");
    assert!(message.contains("unable to resolve dependency ghost"), "{message}");
    assert!(message.contains("unable to resolve dependency phantom"), "{message}");

    Ok(())
}

#[test]
fn test_allow_unresolved_adds_dangling_packages() -> Result<()> {
    let mut env = environment()?;
    env.config_mut().allow_unresolved = true;

    let graph = env.graph()?;
    assert!(graph.package("ghost:@").is_some_and(|p| p.is_dangling()));
    assert_eq!(graph.edge_origin(&local("b", "1.0"), "phantom:@"), Some("phantom"));

    let remote = env.run(Commands::Filter {
        local: false,
        not_local: true,
        sources: Vec::new(),
        not_sources: Vec::new(),
    })?;
    assert_eq!(remote, ["ghost:@", "phantom:@"]);

    Ok(())
}
