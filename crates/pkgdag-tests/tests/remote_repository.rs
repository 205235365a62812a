//! Integration tests for repositories served over HTTP
//!
//! Uses a mockito server in place of a real package mirror.

use anyhow::Result;
use mockito::Server;
use pkgdag_lib::application::Commands;
use pkgdag_lib::testing::definition;
use pkgdag_tests::TestEnvironment;
use pkgdag_tests::fixtures::{external, index_body, local};

#[test]
fn test_dependency_resolved_from_remote_index() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/main/x86_64/index.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(index_body(&[("zlib", "1.3.1-r0"), ("zlib", "1.2.13-r2")]))
        .expect(1)
        .create();
    let repo = format!("{}/main", server.url());

    let env = TestEnvironment::with_definitions(vec![
        definition("curl", "8.4.0", &["zlib"]).with_repositories([repo.as_str()]),
        definition("git", "2.42.0", &["zlib"]).with_repositories([repo.as_str()]),
    ])?;

    let graph = env.graph()?;
    mock.assert();

    let zlib = external("zlib", "1.3.1-r0", &repo);
    assert!(graph.has_edge(&local("curl", "8.4.0"), &zlib));
    assert!(graph.has_edge(&local("git", "2.42.0"), &zlib));
    assert!(!graph.contains(&external("zlib", "1.2.13-r2", &repo)));

    Ok(())
}

#[test]
fn test_pinned_dependency_selects_older_remote_version() -> Result<()> {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/main/x86_64/index.json")
        .with_status(200)
        .with_body(index_body(&[("zlib", "1.3.1-r0"), ("zlib", "1.2.13-r2")]))
        .create();
    let repo = format!("{}/main", server.url());

    let env = TestEnvironment::with_definitions(vec![
        definition("curl", "8.4.0", &["zlib=1.2.13-r2"]).with_repositories([repo.as_str()]),
    ])?;

    let deps = env.run(Commands::Deps {
        key: local("curl", "8.4.0"),
    })?;
    assert_eq!(deps, [external("zlib", "1.2.13-r2", &repo)]);

    Ok(())
}

#[test]
fn test_server_error_is_fatal() -> Result<()> {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/main/x86_64/index.json")
        .with_status(500)
        .create();
    let repo = format!("{}/main", server.url());

    let env = TestEnvironment::with_definitions(vec![
        definition("curl", "8.4.0", &[]).with_repositories([repo.as_str()]),
    ])?;

    let message = format!("{:#}", env.graph().unwrap_err());
    assert!(message.contains("unable to load repositories for curl-8.4.0-r0"), "{message}");

    Ok(())
}
