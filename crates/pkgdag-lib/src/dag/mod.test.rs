use super::*;
use crate::package::{DanglingPackage, ExternalPackage};
use crate::repository::ResolveError;

fn external(name: &str, version: &str) -> Package {
    Package::External(ExternalPackage {
        name: name.to_string(),
        version: version.to_string(),
        repository: "https://repo.example".to_string(),
    })
}

fn empty_graph() -> Graph {
    Graph::empty(Arc::new(PackageStore::new()), GraphOptions::default())
}

#[test]
fn test_add_vertex_is_idempotent() {
    let mut graph = empty_graph();

    let (first, added) = graph.add_vertex(external("zlib", "1.3-r0"));
    assert!(added);
    let (second, added) = graph.add_vertex(external("zlib", "1.3-r0"));
    assert!(!added);

    assert_eq!(first, second);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.by_name["zlib"], ["zlib:1.3-r0@https://repo.example"]);
}

#[test]
fn test_by_name_tracks_every_variant() {
    let mut graph = empty_graph();
    graph.add_vertex(external("zlib", "1.3-r0"));
    graph.add_vertex(external("zlib", "1.2-r4"));
    graph.add_vertex(Package::Dangling(DanglingPackage {
        name: "zlib".to_string(),
    }));

    assert_eq!(graph.by_name["zlib"].len(), 3);
    assert!(graph.contains("zlib:@"));
}

#[test]
fn test_add_edge_rejects_cycles() {
    let mut graph = empty_graph();
    let a = external("a", "1");
    let b = external("b", "1");
    let c = external("c", "1");
    let (a_key, b_key, c_key) = (a.key(), b.key(), c.key());
    graph.add_vertex(a);
    graph.add_vertex(b);
    graph.add_vertex(c);

    assert!(graph.add_edge(&a_key, &b_key, DependencyEdge::origin("b")).unwrap());
    assert!(graph.add_edge(&b_key, &c_key, DependencyEdge::origin("c")).unwrap());

    let err = graph
        .add_edge(&c_key, &a_key, DependencyEdge::origin("a"))
        .unwrap_err();
    assert!(matches!(err, DagError::CycleRejected { ref from, ref to } if *from == c_key && *to == a_key));

    let err = graph
        .add_edge(&a_key, &a_key, DependencyEdge::default())
        .unwrap_err();
    assert!(matches!(err, DagError::CycleRejected { .. }));
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_existing_edge_keeps_its_attributes() {
    let mut graph = empty_graph();
    let a = external("a", "1");
    let b = external("b", "1");
    let (a_key, b_key) = (a.key(), b.key());
    graph.add_vertex(a);
    graph.add_vertex(b);

    assert!(graph.add_edge(&a_key, &b_key, DependencyEdge::origin("b")).unwrap());
    assert!(!graph.add_edge(&a_key, &b_key, DependencyEdge::origin("so:libb")).unwrap());

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_origin(&a_key, &b_key), Some("b"));
}

#[test]
fn test_remove_edge() {
    let mut graph = empty_graph();
    let a = external("a", "1");
    let b = external("b", "1");
    let (a_key, b_key) = (a.key(), b.key());
    graph.add_vertex(a);
    graph.add_vertex(b);
    graph.add_edge(&a_key, &b_key, DependencyEdge::origin("b")).unwrap();

    let removed = graph.remove_edge(&a_key, &b_key).unwrap();
    assert_eq!(removed.target_origin.as_deref(), Some("b"));
    assert!(!graph.has_edge(&a_key, &b_key));

    let err = graph.remove_edge(&a_key, &b_key).unwrap_err();
    assert!(matches!(err, DagError::InternalConsistency { .. }));
}

#[test]
fn test_shortest_path_prefers_fewest_hops() {
    let mut graph = empty_graph();
    let keys: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .map(|name| {
            let pkg = external(name, "1");
            let key = pkg.key();
            graph.add_vertex(pkg);
            key
        })
        .collect();

    // a -> b -> c -> d and a -> d
    graph.add_edge(&keys[0], &keys[1], DependencyEdge::default()).unwrap();
    graph.add_edge(&keys[1], &keys[2], DependencyEdge::default()).unwrap();
    graph.add_edge(&keys[2], &keys[3], DependencyEdge::default()).unwrap();
    graph.add_edge(&keys[0], &keys[3], DependencyEdge::default()).unwrap();

    assert_eq!(
        graph.shortest_path(&keys[0], &keys[3]),
        Some(vec![keys[0].clone(), keys[3].clone()])
    );
    assert_eq!(
        graph.shortest_path(&keys[1], &keys[3]),
        Some(vec![keys[1].clone(), keys[2].clone(), keys[3].clone()])
    );
    assert_eq!(graph.shortest_path(&keys[3], &keys[0]), None);
    assert_eq!(graph.shortest_path("missing", &keys[0]), None);
}

#[test]
fn test_fatal_errors() {
    let fatal = DagError::internal("broken");
    assert!(fatal.is_fatal());

    let unresolved = DagError::UnresolvedDependency {
        package: "a-1.0-r0".to_string(),
        dependency: "zzz".to_string(),
        source: ResolveError::NoCandidates {
            dependency: "zzz".to_string(),
        },
    };
    assert!(!unresolved.is_fatal());

    let wrapped = DagError::CycleRepair {
        culprit: "a:1.0-r0@local".to_string(),
        dependency: "b".to_string(),
        source: Box::new(DagError::internal("missing vertex")),
    };
    assert!(wrapped.is_fatal());
}

#[test]
fn test_construction_error_lists_every_failure() {
    let err = DagError::Construction {
        errors: vec![
            DagError::InvalidDependencyName {
                package: "a".to_string(),
            },
            DagError::UnfulfilledDependency {
                package: "b-1.0-r0".to_string(),
                dependency: "c".to_string(),
            },
        ],
    };

    let message = err.to_string();
    assert!(message.starts_with("unable to build graph:\n"));
    assert!(message.contains("empty package name in environment packages for a"));
    assert!(message.contains("b-1.0-r0: unfulfilled dependency c"));
}

#[test]
fn test_irreparable_cycle_message_shows_path() {
    let err = DagError::IrreparableCycle {
        from: "b:1-r0@local".to_string(),
        to: "a:1-r0@local".to_string(),
        path: vec!["a:1-r0@local".to_string(), "b:1-r0@local".to_string()],
    };
    assert_eq!(
        err.to_string(),
        "unresolvable cycle: b:1-r0@local -> a:1-r0@local, caused by: a:1-r0@local -> b:1-r0@local"
    );
}

#[test]
fn test_options_builder() {
    let opts = GraphOptions::new()
        .with_repositories(["https://one", "https://two"])
        .with_keys(["/keys/one.pub"])
        .allow_unresolved(true)
        .with_arch("aarch64");

    assert_eq!(opts.repositories, ["https://one", "https://two"]);
    assert_eq!(opts.keys, ["/keys/one.pub"]);
    assert!(opts.allow_unresolved);
    assert_eq!(opts.arch, "aarch64");
    assert_eq!(GraphOptions::default().arch, DEFAULT_ARCH);

    let debug = format!("{:?}", opts);
    assert!(debug.contains("aarch64"));
}
