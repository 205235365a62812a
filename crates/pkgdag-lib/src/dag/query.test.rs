use super::*;
use crate::testing::{definition, graph, local_key};

/// a -> b, a -> c, b -> d, c -> d
fn diamond() -> Graph {
    graph(vec![
        definition("a", "1.0", &["b", "c"]),
        definition("b", "1.0", &["d"]),
        definition("c", "1.0", &["d"]),
        definition("d", "1.0", &[]),
    ])
    .unwrap()
}

fn position(order: &[&Package], key: &str) -> usize {
    order.iter().position(|pkg| pkg.key() == key).unwrap()
}

#[test]
fn test_sorted_places_dependents_first() {
    let graph = diamond();
    let sorted = graph.sorted().unwrap();
    let reversed = graph.reverse_sorted().unwrap();
    assert_eq!(sorted.len(), 4);

    for (from, to) in [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")] {
        let (from, to) = (local_key(from, "1.0"), local_key(to, "1.0"));
        assert!(position(&sorted, &from) < position(&sorted, &to));
        assert!(position(&reversed, &from) > position(&reversed, &to));
    }
}

#[test]
fn test_dependencies_of_is_sorted() {
    let graph = diamond();

    assert_eq!(
        graph.dependencies_of(&local_key("a", "1.0")),
        [local_key("b", "1.0"), local_key("c", "1.0")]
    );
    assert!(graph.dependencies_of(&local_key("d", "1.0")).is_empty());
    assert!(graph.dependencies_of("nope:1@local").is_empty());
}

#[test]
fn test_nodes_are_sorted_keys() {
    let graph = graph(vec![
        definition("zlib", "1.3", &[]),
        definition("abseil", "2024", &["zlib"]),
    ])
    .unwrap();

    assert_eq!(
        graph.nodes(),
        [local_key("abseil", "2024"), local_key("zlib", "1.3")]
    );
}

#[test]
fn test_nodes_by_name_returns_every_version() {
    let graph = graph(vec![
        definition("b", "1.0", &[]),
        definition("b", "2.0", &[]),
        definition("a", "1.0", &["b"]),
    ])
    .unwrap();

    let mut versions: Vec<&str> = graph
        .nodes_by_name("b")
        .into_iter()
        .map(Package::version)
        .collect();
    versions.sort();
    assert_eq!(versions, ["1.0-r0", "2.0-r0"]);
    assert!(graph.nodes_by_name("c").is_empty());
}

#[test]
fn test_packages_lists_origin_names() {
    let graph = graph(vec![
        definition("openssl", "3.1", &[]).with_subpackages(["libssl3"]),
        definition("curl", "8.4", &["libssl3"]),
    ])
    .unwrap();

    assert_eq!(graph.packages(), ["curl", "openssl"]);
}

#[test]
fn test_predecessor_map_inverts_edges() {
    let graph = diamond();
    let map = graph.predecessor_map();

    let mut dependents = map[&local_key("d", "1.0")].clone();
    dependents.sort();
    assert_eq!(dependents, [local_key("b", "1.0"), local_key("c", "1.0")]);
    assert!(map[&local_key("a", "1.0")].is_empty());
    assert_eq!(map.len(), 4);
}
