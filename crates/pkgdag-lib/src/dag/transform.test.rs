use super::*;
use crate::dag::GraphOptions;
use crate::package::package_key;
use crate::repository::{MockIndexLoader, RepositoryIndex};
use crate::store::StoreError;
use crate::testing::{definition, graph, graph_with, local_key};

const EXT: &str = "https://ext.example/os";

fn chain() -> Graph {
    graph(vec![
        definition("a", "1.0", &["b"]),
        definition("b", "1.0", &["c"]),
        definition("c", "1.0", &[]),
        definition("d", "1.0", &[]),
    ])
    .unwrap()
}

/// a and b are local, both depend on external zlib; a depends on b
fn mixed() -> Graph {
    let loader = Arc::new(MockIndexLoader::new().with_index(
        RepositoryIndex::new(EXT, "").with_entry("zlib", "1.3-r0", &[]),
    ));
    graph_with(
        vec![
            definition("a", "1.0", &["b", "zlib"]),
            definition("b", "1.0", &["zlib"]),
        ],
        GraphOptions::default()
            .with_repositories([EXT])
            .with_index_loader(loader),
    )
    .unwrap()
}

fn zlib() -> String {
    package_key("zlib", "1.3-r0", EXT)
}

// ============================================================================
// Subgraphs
// ============================================================================

#[test]
fn test_leaves_collect_every_dependent() {
    let graph = chain();
    let sub = graph.subgraph_with_leaves(&["c"]).unwrap();

    assert_eq!(
        sub.nodes(),
        [local_key("a", "1.0"), local_key("b", "1.0"), local_key("c", "1.0")]
    );
    assert!(sub.has_edge(&local_key("a", "1.0"), &local_key("b", "1.0")));
    assert!(sub.has_edge(&local_key("b", "1.0"), &local_key("c", "1.0")));
    assert_eq!(sub.edge_count(), 2);
    assert_eq!(sub.packages(), ["a", "b", "c"]);

    // the source graph is untouched
    assert_eq!(graph.node_count(), 4);
}

#[test]
fn test_leaves_visit_shared_dependents_once() {
    let graph = graph(vec![
        definition("top", "1.0", &["left", "right"]),
        definition("left", "1.0", &["base"]),
        definition("right", "1.0", &["base"]),
        definition("base", "1.0", &[]),
    ])
    .unwrap();

    let sub = graph.subgraph_with_leaves(&["base"]).unwrap();
    assert_eq!(sub.node_count(), 4);
    assert_eq!(sub.edge_count(), 4);
    assert_eq!(
        sub.edge_origin(&local_key("top", "1.0"), &local_key("left", "1.0")),
        Some("left")
    );
}

#[test]
fn test_leaves_accept_external_keys() {
    let graph = mixed();
    let sub = graph.subgraph_with_leaves(&[zlib()]).unwrap();

    assert_eq!(sub.node_count(), 3);
    assert!(sub.has_edge(&local_key("b", "1.0"), &zlib()));
    assert!(sub.has_edge(&local_key("a", "1.0"), &local_key("b", "1.0")));
    assert_eq!(sub.packages(), ["a", "b"]);
}

#[test]
fn test_leaves_store_holds_only_kept_versions() {
    let graph = graph(vec![
        definition("app", "1.0", &["lib"]),
        definition("lib", "1.0", &[]),
        definition("lib", "2.0", &[]),
    ])
    .unwrap();

    let sub = graph.subgraph_with_leaves(&[local_key("lib", "2.0")]).unwrap();
    assert_eq!(sub.nodes(), [local_key("app", "1.0"), local_key("lib", "2.0")]);

    let stored: Vec<String> = sub.store().packages().iter().map(|p| p.key()).collect();
    assert_eq!(stored, [local_key("app", "1.0"), local_key("lib", "2.0")]);
}

#[test]
fn test_unknown_leaf_fails() {
    let err = chain().subgraph_with_leaves(&["nope"]).unwrap_err();
    assert!(matches!(err, DagError::PackageNotFound { name } if name == "nope"));
}

#[test]
fn test_roots_rebuild_transitive_closure() {
    let graph = chain();
    let sub = graph.subgraph_with_roots(&["b"]).unwrap();

    assert_eq!(sub.nodes(), [local_key("b", "1.0"), local_key("c", "1.0")]);
    assert_eq!(sub.packages(), ["b", "c"]);
    let order: Vec<String> = sub
        .reverse_sorted()
        .unwrap()
        .into_iter()
        .map(Package::key)
        .collect();
    assert_eq!(order, [local_key("c", "1.0"), local_key("b", "1.0")]);
}

#[test]
fn test_unknown_root_fails() {
    let err = chain().subgraph_with_roots(&["nope"]).unwrap_err();
    assert!(matches!(
        err,
        DagError::Store(StoreError::PackageNotFound { .. })
    ));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_filter_keeps_edges_between_survivors() {
    let graph = mixed();
    let local = graph.filter(filter_local());

    assert_eq!(local.nodes(), [local_key("a", "1.0"), local_key("b", "1.0")]);
    assert_eq!(local.edge_count(), 1);
    assert_eq!(
        local.edge_origin(&local_key("a", "1.0"), &local_key("b", "1.0")),
        Some("b")
    );

    let remote = graph.filter(filter_not_local());
    assert_eq!(remote.nodes(), [zlib()]);
    assert_eq!(remote.edge_count(), 0);
}

#[test]
fn test_filter_edges_match_predicate_on_both_ends() {
    let graph = mixed();
    let keep = |pkg: &Package| pkg.name() != "b";
    let filtered = graph.filter(keep);

    for from in graph.nodes() {
        for to in graph.nodes() {
            let expected = graph.has_edge(&from, &to)
                && keep(graph.package(&from).unwrap())
                && keep(graph.package(&to).unwrap());
            assert_eq!(filtered.has_edge(&from, &to), expected, "{from} -> {to}");
        }
    }
}

#[test]
fn test_source_filters() {
    let graph = mixed();

    assert_eq!(graph.filter(filter_sources([EXT])).nodes(), [zlib()]);
    assert_eq!(graph.filter(filter_sources([EXT, LOCAL])).node_count(), 3);
    assert_eq!(graph.filter(filter_not_sources([EXT, LOCAL])).node_count(), 0);
    assert_eq!(graph.filter(filter_sources(Vec::<String>::new())).node_count(), 0);
}
