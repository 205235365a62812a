use super::*;
use crate::dag::GraphOptions;
use crate::package::{ExternalPackage, Package};
use crate::repository::RepositoryIndex;
use crate::store::PackageStore;
use std::sync::Arc;

const REPO: &str = "https://repo.example/os";

fn external(name: &str, version: &str) -> Package {
    Package::External(ExternalPackage {
        name: name.to_string(),
        version: version.to_string(),
        repository: REPO.to_string(),
    })
}

/// `x -> y` tagged with dependency "y"; returns the graph and both keys
fn linked_pair() -> (Graph, String, String) {
    let mut graph = Graph::empty(Arc::new(PackageStore::new()), GraphOptions::default());
    let x = external("x", "1");
    let y = external("y", "1");
    let (x_key, y_key) = (x.key(), y.key());
    graph.add_vertex(x);
    graph.add_vertex(y);
    graph
        .add_edge(&x_key, &y_key, DependencyEdge::origin("y"))
        .unwrap();
    (graph, x_key, y_key)
}

fn resolver(index: RepositoryIndex) -> PackageResolver {
    PackageResolver::new(vec![Arc::new(index)])
}

#[test]
fn test_rotation_re_resolves_displaced_dependency() {
    let (mut graph, x_key, y_key) = linked_pair();
    let resolver = resolver(
        RepositoryIndex::new(REPO, "x86_64")
            .with_entry("y", "1", &[])
            .with_entry("y", "0.5", &[]),
    );

    // y now wants to depend on x
    let pending = PendingCycle {
        source: y_key.clone(),
        target: x_key.clone(),
    };
    graph
        .resolve_cycle(&pending, "x", &resolver, "local")
        .unwrap();

    let older_y = external("y", "0.5").key();
    assert_eq!(graph.edge_origin(&y_key, &x_key), Some("x"));
    assert_eq!(graph.edge_origin(&x_key, &older_y), Some("y"));
    assert!(!graph.has_edge(&x_key, &y_key));
    assert!(graph.sorted().is_ok());
}

#[test]
fn test_second_cycle_abandons_repair() {
    let (mut graph, x_key, y_key) = linked_pair();
    let resolver = resolver(RepositoryIndex::new(REPO, "x86_64").with_entry("y", "1", &[]));

    let pending = PendingCycle {
        source: y_key.clone(),
        target: x_key.clone(),
    };
    let err = graph
        .resolve_cycle(&pending, "x", &resolver, "local")
        .unwrap_err();

    match err {
        DagError::IrreparableCycle { from, to, path } => {
            assert_eq!(from, y_key);
            assert_eq!(to, x_key);
            assert_eq!(path, [x_key, y_key]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_failed_re_resolution_is_wrapped() {
    let (mut graph, x_key, y_key) = linked_pair();
    let resolver = resolver(RepositoryIndex::new(REPO, "x86_64"));

    let pending = PendingCycle {
        source: y_key,
        target: x_key.clone(),
    };
    let err = graph
        .resolve_cycle(&pending, "x", &resolver, "local")
        .unwrap_err();

    assert!(
        matches!(&err, DagError::CycleRepair { culprit, dependency, source } if *culprit == x_key && dependency == "y" && matches!(**source, DagError::UnresolvedDependency { .. }))
    );
    assert!(!err.is_fatal());
}

#[test]
fn test_missing_path_is_internal_error() {
    let (mut graph, x_key, y_key) = linked_pair();
    let pending = PendingCycle {
        source: x_key,
        target: y_key,
    };

    let err = graph
        .resolve_cycle(&pending, "y", &PackageResolver::default(), "local")
        .unwrap_err();
    assert!(matches!(err, DagError::InternalConsistency { .. }));
}

#[test]
fn test_untagged_edge_is_internal_error() {
    let mut graph = Graph::empty(Arc::new(PackageStore::new()), GraphOptions::default());
    let sub = external("libfoo", "1");
    let origin = external("foo", "1");
    let (sub_key, origin_key) = (sub.key(), origin.key());
    graph.add_vertex(sub);
    graph.add_vertex(origin);
    graph
        .add_edge(&sub_key, &origin_key, DependencyEdge::default())
        .unwrap();

    let pending = PendingCycle {
        source: origin_key,
        target: sub_key,
    };
    let err = graph
        .resolve_cycle(&pending, "libfoo", &PackageResolver::default(), "local")
        .unwrap_err();
    assert!(err.is_fatal());
}
