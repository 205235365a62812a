use super::*;
use crate::repository::MockIndexLoader;
use crate::store::Definition;
use crate::testing::{definition, local_key, store};

const EXT: &str = "https://ext.example/os";

fn build(definitions: Vec<Definition>, opts: GraphOptions) -> Result<Graph, DagError> {
    Graph::build(store(definitions).unwrap(), opts)
}

fn ext_key(name: &str, version: &str) -> String {
    package_key(name, version, EXT)
}

fn reverse_sorted_keys(graph: &Graph) -> Vec<String> {
    graph
        .reverse_sorted()
        .unwrap()
        .into_iter()
        .map(Package::key)
        .collect()
}

fn construction_errors(result: Result<Graph, DagError>) -> Vec<DagError> {
    match result {
        Err(DagError::Construction { errors }) => errors,
        other => panic!("expected construction errors, got {:?}", other.map(|g| g.nodes())),
    }
}

fn ext_loader(index: RepositoryIndex) -> Arc<MockIndexLoader> {
    Arc::new(MockIndexLoader::new().with_index(index))
}

// ============================================================================
// Basic resolution
// ============================================================================

#[test]
fn test_chain_builds_in_dependency_order() {
    let graph = build(
        vec![
            definition("a", "1.0", &["b"]),
            definition("b", "1.0", &["c"]),
            definition("c", "1.0", &[]),
        ],
        GraphOptions::default(),
    )
    .unwrap();

    assert_eq!(
        reverse_sorted_keys(&graph),
        [local_key("c", "1.0"), local_key("b", "1.0"), local_key("a", "1.0")]
    );
    assert_eq!(
        graph.edge_origin(&local_key("a", "1.0"), &local_key("b", "1.0")),
        Some("b")
    );
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_dependency_resolved_through_provides() {
    let graph = build(
        vec![
            definition("a", "1.0", &["so:libb.so.1"]),
            definition("b", "1.0", &[]).with_provides(["so:libb.so.1=1"]),
        ],
        GraphOptions::default(),
    )
    .unwrap();

    assert!(graph.has_edge(&local_key("a", "1.0"), &local_key("b", "1.0")));
    assert_eq!(
        graph.edge_origin(&local_key("a", "1.0"), &local_key("b", "1.0")),
        Some("so:libb.so.1")
    );
}

#[test]
fn test_highest_version_wins_unless_pinned() {
    let graph = build(
        vec![
            definition("a", "1.0", &["b"]),
            definition("c", "1.0", &["b=1.0-r0"]),
            definition("b", "1.0", &[]),
            Definition::new("b", "2.0", 0),
        ],
        GraphOptions::default(),
    )
    .unwrap();

    assert_eq!(
        graph.dependencies_of(&local_key("a", "1.0")),
        [local_key("b", "2.0")]
    );
    assert_eq!(
        graph.dependencies_of(&local_key("c", "1.0")),
        [local_key("b", "1.0")]
    );
}

#[test]
fn test_subpackage_dependency_points_at_origin() {
    let graph = build(
        vec![
            definition("openssl", "3.1", &[]).with_subpackages(["libcrypto3"]),
            definition("curl", "8.4", &["libcrypto3"]),
        ],
        GraphOptions::default(),
    )
    .unwrap();

    assert_eq!(
        graph.dependencies_of(&local_key("curl", "8.4")),
        [local_key("openssl", "3.1")]
    );
    assert!(!graph.contains(&local_key("libcrypto3", "3.1")));
}

#[test]
fn test_other_subpackage_versions_depend_on_origin() {
    let graph = build(
        vec![
            definition("gcc", "13.2", &[]).with_subpackages(["libstdc++"]),
            definition("gcc", "12.3", &[]).with_subpackages(["libstdc++"]),
        ],
        GraphOptions::default(),
    )
    .unwrap();

    let old_sub = local_key("libstdc++", "12.3");
    let new_sub = local_key("libstdc++", "13.2");
    assert!(graph.has_edge(&old_sub, &local_key("gcc", "13.2")));
    assert!(graph.has_edge(&new_sub, &local_key("gcc", "12.3")));
    assert_eq!(graph.edge_origin(&old_sub, &local_key("gcc", "13.2")), None);
    assert!(!graph.has_edge(&new_sub, &local_key("gcc", "13.2")));
}

// ============================================================================
// Self dependencies
// ============================================================================

#[test]
fn test_self_candidate_is_skipped_for_older_version() {
    let loader = ext_loader(RepositoryIndex::new(EXT, "").with_entry("go", "1.20-r0", &[]));
    let graph = build(
        vec![definition("go", "1.21", &["go"])],
        GraphOptions::default()
            .with_repositories([EXT])
            .with_index_loader(loader),
    )
    .unwrap();

    assert_eq!(
        graph.dependencies_of(&local_key("go", "1.21")),
        [ext_key("go", "1.20-r0")]
    );
}

#[test]
fn test_only_self_candidate_is_unfulfilled() {
    let errors = construction_errors(build(
        vec![definition("go", "1.21", &["go"])],
        GraphOptions::default(),
    ));
    assert_eq!(errors.len(), 1);
    assert!(
        matches!(&errors[0], DagError::UnfulfilledDependency { package, dependency } if package == "go-1.21-r0" && dependency == "go")
    );

    let graph = build(
        vec![definition("go", "1.21", &["go"])],
        GraphOptions::default().allow_unresolved(true),
    )
    .unwrap();
    assert!(graph.has_edge(&local_key("go", "1.21"), "go:@"));
    assert!(!graph.has_edge(&local_key("go", "1.21"), &local_key("go", "1.21")));
}

#[test]
fn test_own_subpackage_never_satisfies_origin() {
    let errors = construction_errors(build(
        vec![definition("perl", "5.38", &["perl-doc"]).with_subpackages(["perl-doc"])],
        GraphOptions::default(),
    ));
    assert!(matches!(&errors[0], DagError::UnfulfilledDependency { .. }));
}

// ============================================================================
// Unresolved dependencies
// ============================================================================

#[test]
fn test_unresolved_dependency_becomes_dangling_when_allowed() {
    let graph = build(
        vec![definition("a", "1.0", &["zzz"])],
        GraphOptions::default().allow_unresolved(true),
    )
    .unwrap();

    assert!(graph.contains("zzz:@"));
    assert!(graph.package("zzz:@").unwrap().is_dangling());
    assert!(graph.has_edge(&local_key("a", "1.0"), "zzz:@"));
    assert_eq!(graph.edge_origin(&local_key("a", "1.0"), "zzz:@"), Some("zzz"));
}

#[test]
fn test_unresolved_dependency_fails_when_not_allowed() {
    let errors = construction_errors(build(
        vec![definition("a", "1.0", &["zzz"])],
        GraphOptions::default(),
    ));

    assert_eq!(errors.len(), 1);
    assert!(
        matches!(&errors[0], DagError::UnresolvedDependency { dependency, .. } if dependency == "zzz")
    );
}

#[test]
fn test_errors_accumulate_across_packages() {
    let errors = construction_errors(build(
        vec![
            definition("a", "1.0", &["", "missing-one"]),
            definition("b", "1.0", &["missing-two"]),
            definition("c", "1.0", &["a"]),
        ],
        GraphOptions::default(),
    ));

    assert_eq!(errors.len(), 3);
    assert!(matches!(&errors[0], DagError::InvalidDependencyName { package } if package == "a"));
    assert!(matches!(&errors[1], DagError::UnresolvedDependency { dependency, .. } if dependency == "missing-one"));
    assert!(matches!(&errors[2], DagError::UnresolvedDependency { dependency, .. } if dependency == "missing-two"));
}

// ============================================================================
// Cycles
// ============================================================================

#[test]
fn test_mutual_dependency_is_irreparable() {
    let errors = construction_errors(build(
        vec![definition("a", "1.0", &["b"]), definition("b", "1.0", &["a"])],
        GraphOptions::default(),
    ));

    assert_eq!(errors.len(), 1);
    match &errors[0] {
        DagError::IrreparableCycle { from, to, path } => {
            assert_eq!(from, &local_key("b", "1.0"));
            assert_eq!(to, &local_key("a", "1.0"));
            assert_eq!(path, &[local_key("a", "1.0"), local_key("b", "1.0")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_single_rotation_falls_back_to_external_candidate() {
    let loader = ext_loader(RepositoryIndex::new(EXT, "").with_entry("b", "0.9-r0", &[]));
    let graph = build(
        vec![definition("a", "1.0", &["b"]), definition("b", "1.0", &["a"])],
        GraphOptions::default()
            .with_repositories([EXT])
            .with_index_loader(loader.clone()),
    )
    .unwrap();

    let a = local_key("a", "1.0");
    let b = local_key("b", "1.0");
    let ext_b = ext_key("b", "0.9-r0");

    assert!(!graph.has_edge(&a, &b));
    assert_eq!(graph.edge_origin(&b, &a), Some("a"));
    assert_eq!(graph.edge_origin(&a, &ext_b), Some("b"));
    assert_eq!(reverse_sorted_keys(&graph), [ext_b, a, b]);

    // the index is fetched once and reused for the second package
    assert_eq!(loader.calls(), [vec![EXT.to_string()]]);
}

#[test]
fn test_acyclic_candidate_preferred_over_cyclic_one() {
    let loader = ext_loader(RepositoryIndex::new(EXT, "").with_entry("a", "0.5-r0", &[]));
    let graph = build(
        vec![definition("a", "1.0", &["b"]), definition("b", "1.0", &["a"])],
        GraphOptions::default()
            .with_repositories([EXT])
            .with_index_loader(loader),
    )
    .unwrap();

    // local a is cyclic for b, so the lower external a is taken directly
    assert!(graph.has_edge(&local_key("a", "1.0"), &local_key("b", "1.0")));
    assert_eq!(
        graph.dependencies_of(&local_key("b", "1.0")),
        [ext_key("a", "0.5-r0")]
    );
}

// ============================================================================
// Repositories and key material
// ============================================================================

#[test]
fn test_repository_load_failure_is_fatal() {
    let result = build(
        vec![
            definition("a", "1.0", &["zzz"]),
            definition("b", "1.0", &[]).with_repositories(["https://gone.example"]),
        ],
        GraphOptions::default().with_index_loader(Arc::new(MockIndexLoader::new())),
    );

    assert!(matches!(result, Err(DagError::RepositoryLoad { ref package, .. }) if package == "b-1.0-r0"));
}

#[test]
fn test_unsupported_key_scheme_is_fatal() {
    let loader = ext_loader(RepositoryIndex::new(EXT, ""));
    let result = build(
        vec![
            definition("a", "1.0", &[])
                .with_repositories([EXT])
                .with_keyring(["ftp://keys.example/repo.rsa.pub"]),
        ],
        GraphOptions::default().with_index_loader(loader.clone()),
    );

    assert!(matches!(result, Err(DagError::KeyMaterial { ref key, .. }) if key == "ftp://keys.example/repo.rsa.pub"));
    assert!(loader.calls().is_empty());
}

#[test]
fn test_unsupported_key_scheme_is_fatal_without_repositories() {
    let loader = Arc::new(MockIndexLoader::new());
    let result = build(
        vec![definition("a", "1.0", &[]).with_keyring(["ftp://keys.example/repo.rsa.pub"])],
        GraphOptions::default().with_index_loader(loader.clone()),
    );

    assert!(matches!(result, Err(DagError::KeyMaterial { ref key, .. }) if key == "ftp://keys.example/repo.rsa.pub"));
    assert!(loader.calls().is_empty());
}

#[test]
fn test_key_material_checked_when_index_is_cached() {
    let loader = ext_loader(RepositoryIndex::new(EXT, ""));
    let result = build(
        vec![
            definition("a", "1.0", &[]).with_repositories([EXT]),
            definition("b", "1.0", &[])
                .with_repositories([EXT])
                .with_keyring(["ftp://keys.example/repo.rsa.pub"]),
        ],
        GraphOptions::default().with_index_loader(loader.clone()),
    );

    assert!(matches!(result, Err(DagError::KeyMaterial { .. })));
    assert_eq!(loader.calls(), [vec![EXT.to_string()]]);
}

#[test]
fn test_missing_key_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.rsa.pub");
    std::fs::write(&present, b"key").unwrap();
    let present = present.to_string_lossy().to_string();
    let missing = dir.path().join("missing.rsa.pub").to_string_lossy().to_string();

    let loader = Arc::new(MockIndexLoader::new().with_index(
        RepositoryIndex::new(EXT, "").with_entry("zlib", "1.3-r0", &[]),
    ));
    let graph = build(
        vec![
            definition("a", "1.0", &["zlib"])
                .with_repositories([EXT])
                .with_keyring([present.clone(), missing]),
        ],
        GraphOptions::default().with_index_loader(loader),
    )
    .unwrap();

    assert!(graph.has_edge(&local_key("a", "1.0"), &ext_key("zlib", "1.3-r0")));
}

#[test]
fn test_declared_and_global_repositories_are_merged() {
    let other = "https://other.example/os";
    let loader = Arc::new(
        MockIndexLoader::new()
            .with_index(RepositoryIndex::new(EXT, "").with_entry("zlib", "1.3-r0", &[]))
            .with_index(RepositoryIndex::new(other, "").with_entry("xz", "5.4-r0", &[])),
    );
    let graph = build(
        vec![
            definition("a", "1.0", &["zlib", "xz"]).with_repositories([other, EXT]),
            definition("b", "1.0", &["zlib"]),
        ],
        GraphOptions::default()
            .with_repositories([EXT])
            .with_arch("aarch64")
            .with_index_loader(loader.clone()),
    )
    .unwrap();

    assert_eq!(
        graph.dependencies_of(&local_key("a", "1.0")),
        [package_key("xz", "5.4-r0", other), ext_key("zlib", "1.3-r0")]
    );
    assert!(graph.has_edge(&local_key("b", "1.0"), &ext_key("zlib", "1.3-r0")));
    assert_eq!(
        loader.calls(),
        [vec![other.to_string(), EXT.to_string()]]
    );
}
